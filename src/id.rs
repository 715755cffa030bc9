//! Element and attribute addressing
//!
//! Elements are addressed by a `(set, module)` pair. Sets group elements that
//! are created and torn down together, so a whole set can be deleted with a
//! single command.

/// Attribute id local to one element
pub type AttributeId = u16;

/// Composite element id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ElementId {
    pub set_id: u8,
    pub module_id: u8,
}

impl ElementId {
    pub const fn new(set_id: u8, module_id: u8) -> Self {
        Self { set_id, module_id }
    }

    /// 16-bit view of the id (set in the low byte, module in the high byte)
    pub const fn uniq(self) -> u16 {
        u16::from_le_bytes([self.set_id, self.module_id])
    }

    pub const fn from_uniq(value: u16) -> Self {
        let [set_id, module_id] = value.to_le_bytes();
        Self { set_id, module_id }
    }
}

/// Address of a single attribute anywhere in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlobalAddress {
    pub element: ElementId,
    pub attribute: AttributeId,
}

impl GlobalAddress {
    pub const fn new(element: ElementId, attribute: AttributeId) -> Self {
        Self { element, attribute }
    }
}
