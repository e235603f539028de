//! Decoder for the BITS packet transmissions of 2021 day 16.
//!
//! A hex line unpacks into a bit stream holding one outermost packet. Part 1
//! sums the version of every packet in the tree, part 2 evaluates it.

pub mod bits;
pub mod decode;
pub mod error;
pub mod packet;

pub use bits::BitSource;
pub use decode::decode;
pub use error::{BitsError, BitsResult};
pub use packet::{LengthType, OperatorKind, Packet, PacketBody};

pub fn parse(input: &str) -> BitsResult<Packet> {
    decode(&BitSource::from_hex(input)?)
}

pub fn solve(part: u8, packet: &Packet) -> BitsResult<String> {
    if part == 1 {
        Ok(packet.version_sum().to_string())
    } else {
        packet.value().map(|value| value.to_string())
    }
}

pub fn day16(part: u8, input: &str) -> BitsResult<String> {
    solve(part, &parse(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_sums() {
        for (input, sum) in [
            ("D2FE28", "6"),
            ("38006F45291200", "9"),
            ("EE00D40C823060", "14"),
            ("8A004A801A8002F478", "16"),
            ("620080001611562C8802118E34", "12"),
            ("C0015000016115A2E0802F182340", "23"),
            ("A0016C880162017C3686B18A3D4780", "31"),
        ] {
            assert_eq!(day16(1, input).unwrap(), sum, "{}", input);
        }
    }

    #[test]
    fn values() {
        for (input, value) in [
            ("D2FE28", "2021"),
            ("C200B40A82", "3"),
            ("04005AC33890", "54"),
            ("880086C3E88112", "7"),
            ("CE00C43D881120", "9"),
            ("D8005AC2A8F0", "1"),
            ("F600BC2D8F", "0"),
            ("9C005AC2F8F0", "0"),
            ("9C0141080250320F1802104A08", "1"),
        ] {
            assert_eq!(day16(2, input).unwrap(), value, "{}", input);
        }
    }

    #[test]
    fn odd_digit_counts() {
        assert_eq!(day16(2, "102").unwrap(), "1");
        assert_eq!(day16(1, "22007C280").unwrap(), "8");
        assert_eq!(day16(2, "22007C280\n").unwrap(), "5");
    }

    #[test]
    fn input_line_is_trimmed() {
        assert_eq!(day16(2, "C200B40A82\n").unwrap(), "3");
    }

    #[test]
    fn errors_surface_to_the_caller() {
        assert!(matches!(day16(1, "D2FG28"), Err(BitsError::InvalidHex {offset: 3, found: 'G'})));
        assert!(matches!(day16(2, "C200B4"), Err(BitsError::Truncated {..})));
    }
}
