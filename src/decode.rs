use log::{debug, trace};
use num_bigint::BigUint;

use crate::bits::BitSource;
use crate::error::{BitsError, BitsResult};
use crate::packet::{LengthType, OperatorKind, Packet, PacketBody};

pub const HEADER_BITS: usize = 6;
pub const LITERAL_TYPE_ID: u8 = 4;
const GROUP_BITS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub type_id: u8,
}

pub fn read_header(bits: &BitSource, index: usize) -> BitsResult<(Header, usize)> {
    let version = bits.read(index, 3)? as u8;
    let type_id = bits.read(index + 3, 3)? as u8;
    Ok((Header {version, type_id}, index + HEADER_BITS))
}

/// `index` points just past the header. Groups of five bits carry a
/// continuation flag and one nibble of the value each.
pub fn read_literal(bits: &BitSource, mut index: usize, version: u8) -> BitsResult<(Packet, usize)> {
    let mut value = BigUint::default();
    let mut groups = 0;
    loop {
        let more = bits.flag(index)?;
        let nibble = bits.read(index + 1, 4)?;
        value = value << 4u8 | BigUint::from(nibble);
        index += GROUP_BITS;
        groups += 1;
        if !more {break}
    }

    let encoded_bit_length = HEADER_BITS + GROUP_BITS * groups;
    trace!("literal v{} = {} ({} bits)", version, value, encoded_bit_length);
    Ok((Packet {version, encoded_bit_length, body: PacketBody::Literal(value)}, index))
}

/// `index` points just past the header, at the length-type selector.
pub fn read_operator(bits: &BitSource, mut index: usize, version: u8, type_id: u8)
    -> BitsResult<(Packet, usize)>
{
    let kind = OperatorKind::from_type_id(type_id)?;
    let mut children = vec![];

    let length_type = if bits.flag(index)? {
        let count = bits.read(index + 1, LengthType::SUBPACKET_COUNT_WIDTH)? as u16;
        index += 1 + LengthType::SUBPACKET_COUNT_WIDTH;
        for _ in 0 .. count {
            let (child, next) = read_packet(bits, index)?;
            children.push(child);
            index = next;
        }
        LengthType::SubpacketCount(count)
    } else {
        let declared = bits.read(index + 1, LengthType::TOTAL_BITS_WIDTH)? as u16;
        index += 1 + LengthType::TOTAL_BITS_WIDTH;
        let mut consumed = 0;
        while consumed < declared as usize {
            let (child, next) = read_packet(bits, index)?;
            consumed += child.encoded_bit_length;
            children.push(child);
            index = next;
        }
        if consumed != declared as usize {
            return Err(BitsError::LengthOverrun {declared: declared as usize, consumed});
        }
        LengthType::TotalBits(declared)
    };

    let encoded_bit_length = HEADER_BITS + 1 + length_type.field_width()
        + children.iter().map(|child| child.encoded_bit_length).sum::<usize>();
    trace!("{} v{} over {} ({} bits)", kind, version, length_type, encoded_bit_length);
    let body = PacketBody::Operator {kind, length_type, children};
    Ok((Packet {version, encoded_bit_length, body}, index))
}

/// Decodes whichever packet starts at `index`.
pub fn read_packet(bits: &BitSource, index: usize) -> BitsResult<(Packet, usize)> {
    let (Header {version, type_id}, index) = read_header(bits, index)?;
    if type_id == LITERAL_TYPE_ID {
        read_literal(bits, index, version)
    } else {
        read_operator(bits, index, version, type_id)
    }
}

/// Decodes the outermost packet. Whatever follows it is padding.
pub fn decode(bits: &BitSource) -> BitsResult<Packet> {
    let (packet, end) = read_packet(bits, bits.start())?;
    debug!("outermost packet spans {} bits, {} bits of padding left", packet.encoded_bit_length,
           bits.len() - end);
    Ok(packet)
}
