/// Snowflake-style packed identifiers used as message dates in the archive.
///
/// ```text
/// [63..22]  raw timestamp (42 bits, units of 2^22 ns since 2001-01-01T00:00:00Z)
/// [21..12]  worker id     (10 bits)
/// [11..7]   process id    (5 bits)
/// [6..0]    sequence      (7 bits)
/// ```
///
/// Millisecond conversion is done in integer arithmetic so decoded values are
/// exact: `EPOCH_MS + floor(raw * 2^22 / 10^6)`.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::CodecError;

/// Reference epoch, 2001-01-01T00:00:00Z, in Unix milliseconds.
pub const EPOCH_MS: i64 = 978_307_200_000;

/// Nanoseconds per raw timestamp unit (2^22).
pub const NANOS_PER_UNIT: u64 = 1 << 22;

pub const NANOS_PER_MS: u64 = 1_000_000;

pub const TIMESTAMP_BITS: u32 = 42;
pub const WORKER_BITS: u32 = 10;
pub const PROCESS_BITS: u32 = 5;
pub const SEQUENCE_BITS: u32 = 7;

pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;
pub const WORKER_MASK: u64 = (1 << WORKER_BITS) - 1;
pub const PROCESS_MASK: u64 = (1 << PROCESS_BITS) - 1;
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

pub const TIMESTAMP_SHIFT: u32 = WORKER_BITS + PROCESS_BITS + SEQUENCE_BITS;
pub const WORKER_SHIFT: u32 = PROCESS_BITS + SEQUENCE_BITS;
pub const PROCESS_SHIFT: u32 = SEQUENCE_BITS;

/// Decoded fields of a packed identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTimestamp {
    /// Unix milliseconds.
    pub timestamp_ms: i64,
    pub sequence: u32,
    pub worker_id: u32,
    pub process_id: u32,
    pub raw_timestamp: u64,
    pub utc_time: DateTime<Utc>,
}

/// Decode a packed identifier. Every `u64` is a valid input.
pub fn decode(packed: u64) -> DecodedTimestamp {
    let raw_timestamp = (packed >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK;
    let worker_id = ((packed >> WORKER_SHIFT) & WORKER_MASK) as u32;
    let process_id = ((packed >> PROCESS_SHIFT) & PROCESS_MASK) as u32;
    let sequence = (packed & SEQUENCE_MASK) as u32;

    // 42 bits * 2^22 stays below 2^64.
    let ms_since_epoch = (raw_timestamp * NANOS_PER_UNIT) / NANOS_PER_MS;
    let timestamp_ms = EPOCH_MS + ms_since_epoch as i64;

    DecodedTimestamp {
        timestamp_ms,
        sequence,
        worker_id,
        process_id,
        raw_timestamp,
        utc_time: utc_from_millis(timestamp_ms),
    }
}

/// Decode the decimal string form of a packed identifier.
pub fn decode_str(packed: &str) -> Result<DecodedTimestamp, CodecError> {
    let value: u64 = packed
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidIdentifier(packed.to_string()))?;
    Ok(decode(value))
}

/// Decode the signed form SQLite hands back for an INTEGER column.
pub fn decode_i64(packed: i64) -> Result<DecodedTimestamp, CodecError> {
    let value =
        u64::try_from(packed).map_err(|_| CodecError::InvalidIdentifier(packed.to_string()))?;
    Ok(decode(value))
}

fn utc_from_millis(ms: i64) -> DateTime<Utc> {
    // The largest decodable value (~2140) is well inside chrono's range.
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(raw: u64, worker: u64, process: u64, sequence: u64) -> u64 {
        (raw << TIMESTAMP_SHIFT) | (worker << WORKER_SHIFT) | (process << PROCESS_SHIFT) | sequence
    }

    #[test]
    fn test_known_identifiers() {
        let cases = [
            (760592585637712896u64, 1738899785633i64),
            (760506735602625664, 1738813935600),
        ];
        for (packed, expected_ms) in cases {
            assert_eq!(decode(packed).timestamp_ms, expected_ms, "packed={}", packed);
        }
    }

    #[test]
    fn test_known_identifier_fields() {
        let d = decode(760592585637712896);
        assert_eq!(d.raw_timestamp, 181339403542);
        assert_eq!(d.worker_id, 949);
        assert_eq!(d.process_id, 8);
        assert_eq!(d.sequence, 0);
        assert_eq!(d.utc_time.to_rfc3339(), "2025-02-07T03:43:05.633+00:00");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let packed = 760506735602625664;
        assert_eq!(decode(packed), decode(packed));
    }

    #[test]
    fn test_field_extraction() {
        let packed = pack(12345, 1023, 31, 127);
        let d = decode(packed);
        assert_eq!(d.raw_timestamp, 12345);
        assert_eq!(d.worker_id, 1023);
        assert_eq!(d.process_id, 31);
        assert_eq!(d.sequence, 127);

        let d = decode(pack(1, 2, 3, 4));
        assert_eq!((d.raw_timestamp, d.worker_id, d.process_id, d.sequence), (1, 2, 3, 4));
    }

    #[test]
    fn test_floor_division() {
        // One unit is 4.194304 ms, floored to 4.
        assert_eq!(decode(pack(1, 0, 0, 0)).timestamp_ms, EPOCH_MS + 4);
        // 1000 units = 4194.304 ms.
        assert_eq!(decode(pack(1000, 0, 0, 0)).timestamp_ms, EPOCH_MS + 4194);
    }

    #[test]
    fn test_zero_is_epoch() {
        let d = decode(0);
        assert_eq!(d.timestamp_ms, EPOCH_MS);
        assert_eq!(d.utc_time.to_rfc3339(), "2001-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_max_value_does_not_overflow() {
        let d = decode(u64::MAX);
        assert_eq!(d.raw_timestamp, TIMESTAMP_MASK);
        assert_eq!(d.sequence, SEQUENCE_MASK as u32);
        assert!(d.timestamp_ms > EPOCH_MS);
    }

    #[test]
    fn test_decode_str() {
        let d = decode_str("760592585637712896").unwrap();
        assert_eq!(d.timestamp_ms, 1738899785633);
        assert_eq!(decode_str(" 760592585637712896 ").unwrap(), d);
    }

    #[test]
    fn test_decode_str_rejects_garbage() {
        assert!(matches!(decode_str("abc"), Err(CodecError::InvalidIdentifier(s)) if s == "abc"));
        assert!(decode_str("-1").is_err());
        assert!(decode_str("").is_err());
        assert!(decode_str("1.5").is_err());
        assert!(decode_str("18446744073709551616").is_err());
    }

    #[test]
    fn test_decode_i64() {
        assert_eq!(decode_i64(760506735602625664).unwrap().timestamp_ms, 1738813935600);
        assert!(matches!(decode_i64(-5), Err(CodecError::InvalidIdentifier(s)) if s == "-5"));
    }
}
