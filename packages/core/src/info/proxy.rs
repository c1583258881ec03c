//! The element-access proxy.

use std::fmt;
use std::marker::PhantomData;

use mpix_ll_runtime as ll;

use crate::error::expect_rc;
use crate::info::{assert_legal_value, InfoMap};

/// A write-through reference to one key of an [`InfoMap`].
///
/// The native store has no addressable elements, only set-by-key and
/// get-by-key, so a map entry cannot be handed out as a plain reference.
/// The proxy splits access into two explicit verbs instead: [`set`]
/// writes through unconditionally, [`get`] materializes the current value
/// and inserts a single-space placeholder when the key is absent.
///
/// A proxy borrows its map: it cannot outlive it, and the map cannot be
/// mutated or moved while the proxy is alive.
///
/// [`set`]: Proxy::set
/// [`get`]: Proxy::get
pub struct Proxy<'a> {
    handle: ll::InfoHandle,
    key: String,
    _map: PhantomData<&'a mut InfoMap>,
}

impl<'a> Proxy<'a> {
    pub(crate) fn new(handle: ll::InfoHandle, key: &str) -> Proxy<'a> {
        Proxy {
            handle,
            key: key.to_string(),
            _map: PhantomData,
        }
    }

    /// The key this proxy refers to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store `value` under the key, present or not.
    #[track_caller]
    pub fn set(&mut self, value: impl AsRef<str>) {
        let value = value.as_ref();
        assert_legal_value(value);
        expect_rc(ll::info_set(self.handle, &self.key, value), "info_set");
    }

    /// The current value; inserts and returns `" "` when the key is absent.
    #[track_caller]
    pub fn get(&self) -> String {
        let mut value = String::new();
        let mut flag = false;
        expect_rc(
            ll::info_get(self.handle, &self.key, &mut value, &mut flag),
            "info_get",
        );
        if flag {
            value
        } else {
            expect_rc(ll::info_set(self.handle, &self.key, " "), "info_set");
            " ".to_string()
        }
    }
}

/// Composes with [`Proxy::get`]: printing a proxy reads (and may insert)
/// the value.
impl fmt::Display for Proxy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get())
    }
}

impl From<Proxy<'_>> for String {
    fn from(proxy: Proxy<'_>) -> String {
        proxy.get()
    }
}

impl fmt::Debug for Proxy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("handle", &self.handle)
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let mut m = InfoMap::new();
        let mut proxy = m.entry("key");
        proxy.set("value");
        assert_eq!(proxy.get(), "value");
        assert_eq!(proxy.key(), "key");
    }

    #[test]
    fn get_inserts_placeholder() {
        let mut m = InfoMap::new();
        assert_eq!(m.entry("absent").get(), " ");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn display_composes_with_get() {
        let mut m = InfoMap::new();
        m.entry("key").set("value");
        assert_eq!(format!("{}", m.entry("key")), "value");
        // Printing an absent entry inserts the placeholder.
        assert_eq!(format!("{}", m.entry("other")), " ");
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn string_conversion_reads() {
        let mut m = InfoMap::new();
        m.entry("key").set("value");
        let s: String = m.entry("key").into();
        assert_eq!(s, "value");
    }

    #[test]
    #[should_panic(expected = "illegal info value")]
    fn set_rejects_empty_value() {
        let mut m = InfoMap::new();
        m.entry("key").set("");
    }
}
