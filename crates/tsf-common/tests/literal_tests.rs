use super::*;

#[test]
fn intern_is_idempotent() {
    let mut buffer = LiteralBuffer::new();
    let a = buffer.intern("foo");
    let b = buffer.intern("foo");
    assert_eq!(a, b);
    assert_eq!(buffer.len(), 1);
}

#[test]
fn distinct_texts_get_distinct_atoms() {
    let mut buffer = LiteralBuffer::new();
    let a = buffer.intern("foo");
    let b = buffer.intern("bar");
    assert_ne!(a, b);
    assert_eq!(buffer.utf8(a), "foo");
    assert_eq!(buffer.utf8(b), "bar");
}

#[test]
fn utf16_reencoding_handles_astral_plane() {
    let mut buffer = LiteralBuffer::new();
    let atom = buffer.intern("a\u{1F600}b");
    assert_eq!(buffer.utf8_len(atom), 6);
    // Surrogate pair for U+1F600 plus the two ASCII units.
    assert_eq!(buffer.utf16(atom).len(), 4);
}

#[test]
fn hash_is_stable_across_lookups() {
    let mut buffer = LiteralBuffer::new();
    let a = buffer.intern("stable");
    let h1 = buffer.utf8_hash(a);
    let b = buffer.intern("stable");
    assert_eq!(h1, buffer.utf8_hash(b));
}
