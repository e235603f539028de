use std::fmt;

use itertools::Itertools;
use num_bigint::BigUint;

use crate::error::{BitsError, BitsResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorKind {Sum, Product, Minimum, Maximum, GreaterThan, LessThan, EqualTo}

impl OperatorKind {
    /// Type id 4 belongs to literals and is not an operator.
    pub fn from_type_id(type_id: u8) -> BitsResult<Self> {
        Ok(match type_id {
            0 => OperatorKind::Sum, 1 => OperatorKind::Product,
            2 => OperatorKind::Minimum, 3 => OperatorKind::Maximum,
            5 => OperatorKind::GreaterThan, 6 => OperatorKind::LessThan,
            7 => OperatorKind::EqualTo,
            _ => return Err(BitsError::UnknownTypeId(type_id))
        })
    }

    pub fn type_id(self) -> u8 {
        match self {
            OperatorKind::Sum => 0, OperatorKind::Product => 1,
            OperatorKind::Minimum => 2, OperatorKind::Maximum => 3,
            OperatorKind::GreaterThan => 5, OperatorKind::LessThan => 6,
            OperatorKind::EqualTo => 7,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, OperatorKind::GreaterThan | OperatorKind::LessThan | OperatorKind::EqualTo)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperatorKind::Sum => "sum",
            OperatorKind::Product => "product",
            OperatorKind::Minimum => "minimum",
            OperatorKind::Maximum => "maximum",
            OperatorKind::GreaterThan => "greater-than",
            OperatorKind::LessThan => "less-than",
            OperatorKind::EqualTo => "equal-to",
        })
    }
}

/// How an operator packet frames its subpackets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthType {
    /// Selector 0: the subpackets span exactly this many bits.
    TotalBits(u16),
    /// Selector 1: exactly this many subpackets follow.
    SubpacketCount(u16),
}

impl LengthType {
    pub const TOTAL_BITS_WIDTH: usize = 15;
    pub const SUBPACKET_COUNT_WIDTH: usize = 11;

    /// Width of the length field following the selector bit.
    pub fn field_width(self) -> usize {
        match self {
            LengthType::TotalBits(_) => Self::TOTAL_BITS_WIDTH,
            LengthType::SubpacketCount(_) => Self::SUBPACKET_COUNT_WIDTH,
        }
    }
}

impl fmt::Display for LengthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthType::TotalBits(n) => write!(f, "{} bits", n),
            LengthType::SubpacketCount(n) => write!(f, "{} subpackets", n),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketBody {
    Literal(BigUint),
    Operator {kind: OperatorKind, length_type: LengthType, children: Vec<Packet>},
}

/// One decoded packet. `encoded_bit_length` covers the header and everything
/// nested below it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub encoded_bit_length: usize,
    pub body: PacketBody,
}

impl Packet {
    pub fn children(&self) -> &[Packet] {
        match &self.body {
            PacketBody::Literal(_) => &[],
            PacketBody::Operator {children, ..} => children.as_slice(),
        }
    }

    /// Pre-order walk over this packet and every packet nested in it.
    pub fn iter(&self) -> Packets<'_> {
        Packets {stack: vec![self]}
    }

    pub fn version_sum(&self) -> u64 {
        self.iter().map(|packet| packet.version as u64).sum()
    }

    pub fn value(&self) -> BitsResult<BigUint> {
        let (kind, children) = match &self.body {
            PacketBody::Literal(value) => return Ok(value.clone()),
            PacketBody::Operator {kind, children, ..} => (*kind, children),
        };
        let values = children.iter().map(Packet::value).collect::<BitsResult<Vec<_>>>()?;

        if kind.is_comparison() {
            let [left, right] = &values[..] else {
                return Err(BitsError::Arity {kind, found: values.len()})
            };
            let holds = match kind {
                OperatorKind::GreaterThan => left > right,
                OperatorKind::LessThan => left < right,
                _ => left == right,
            };
            return Ok(BigUint::from(holds as u8));
        }

        match kind {
            OperatorKind::Sum => Ok(values.into_iter().sum()),
            OperatorKind::Product => Ok(values.into_iter().product()),
            OperatorKind::Minimum => values.into_iter().min().ok_or(BitsError::NoOperands {kind}),
            _ => values.into_iter().max().ok_or(BitsError::NoOperands {kind}),
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = 2 * depth;
        match &self.body {
            PacketBody::Literal(value) =>
                writeln!(f, "{:indent$}v{} literal {}", "", self.version, value),
            PacketBody::Operator {kind, length_type, children} => {
                writeln!(f, "{:indent$}v{} {} over {} [{}]", "", self.version, kind, length_type,
                         children.iter().map(|child| child.encoded_bit_length).join(", "))?;
                children.iter().try_for_each(|child| child.write_tree(f, depth + 1))
            }
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

pub struct Packets<'a> {
    stack: Vec<&'a Packet>,
}

impl<'a> Iterator for Packets<'a> {
    type Item = &'a Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let packet = self.stack.pop()?;
        self.stack.extend(packet.children().iter().rev());
        Some(packet)
    }
}
