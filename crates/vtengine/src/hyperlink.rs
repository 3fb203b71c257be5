//! OSC 8 hyperlink registry.
//!
//! Cells only carry a small integer id (`Cell::hyperlink_id`); the
//! `(user_id, uri)` pair it addresses lives here, interned once per distinct
//! value so repeated `OSC 8` runs over the same link don't grow memory with
//! the cell count.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    pub user_id: Option<String>,
    pub uri: String,
}

#[derive(Debug, Default)]
pub struct HyperlinkRegistry {
    links: Vec<Hyperlink>,
    interned: HashMap<Hyperlink, u32>,
}

impl HyperlinkRegistry {
    pub fn new() -> Self {
        HyperlinkRegistry::default()
    }

    /// Parse an `OSC 8 ; params ; uri` payload (`params` is a `:`-separated
    /// list of `key=value` pairs; only `id=` is meaningful here) and intern
    /// it. An empty `uri` closes the current hyperlink run and returns `None`.
    pub fn intern_osc8(&mut self, payload: &str) -> Option<u32> {
        let mut parts = payload.splitn(2, ';');
        let params = parts.next().unwrap_or("");
        let uri = parts.next().unwrap_or("");
        if uri.is_empty() {
            return None;
        }
        let user_id = params.split(':').find_map(|kv| kv.strip_prefix("id=")).map(str::to_string);
        Some(self.intern(Hyperlink { user_id, uri: uri.to_string() }))
    }

    pub fn intern(&mut self, link: Hyperlink) -> u32 {
        if let Some(&id) = self.interned.get(&link) {
            return id;
        }
        let id = self.links.len() as u32;
        self.interned.insert(link.clone(), id);
        self.links.push(link);
        id
    }

    pub fn get(&self, id: u32) -> Option<&Hyperlink> {
        self.links.get(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_uri_and_id_interns_once() {
        let mut reg = HyperlinkRegistry::new();
        let a = reg.intern_osc8("id=x;https://example.com").unwrap();
        let b = reg.intern_osc8("id=x;https://example.com").unwrap();
        assert_eq!(a, b);
        assert_eq!(reg.get(a).unwrap().uri, "https://example.com");
    }

    #[test]
    fn empty_uri_closes_without_interning() {
        let mut reg = HyperlinkRegistry::new();
        assert!(reg.intern_osc8("id=x;").is_none());
    }

    #[test]
    fn distinct_uris_get_distinct_ids() {
        let mut reg = HyperlinkRegistry::new();
        let a = reg.intern_osc8("id=x;https://example.com/a").unwrap();
        let b = reg.intern_osc8("id=x;https://example.com/b").unwrap();
        assert_ne!(a, b);
    }
}
