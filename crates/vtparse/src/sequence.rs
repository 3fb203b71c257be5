//! The `Sequence` value a completed control function is reduced to.

use crate::params::Params;

/// Which envelope a [`Sequence`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Esc,
    Csi,
    Osc,
    Dcs,
    Apc,
    Pm,
    Sos,
}

/// Accumulated parser events reduced to one addressable control function.
///
/// `(category, leader, intermediates, final_byte)` is the lookup key a
/// [`FunctionDefinition`](crate::function::FunctionDefinition) table is keyed
/// on; `params` and `text` carry the per-invocation data.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pub category: Option<Category>,
    pub leader: Option<u8>,
    pub intermediates: Vec<u8>,
    pub final_byte: Option<u8>,
    pub params: Params,
    /// OSC/DCS string payload, built incrementally from `Print`/`DcsPut`.
    pub text: Vec<u8>,
}

impl Sequence {
    pub fn reset(&mut self) {
        self.category = None;
        self.leader = None;
        self.intermediates.clear();
        self.final_byte = None;
        self.params.clear();
        self.text.clear();
    }

    pub fn text_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Esc
    }
}
