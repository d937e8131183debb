//! Little-endian field codec: [`PacketWriter`], [`PacketReader`] and the
//! [`Wire`] trait that ties Rust types to their byte layout.
//!
//! The reader is deliberately forgiving. A payload that ends early does not
//! produce an error; every read past the end returns the type's zero value
//! and parks the cursor at the end of the buffer. A malformed trailing field
//! therefore never takes down an otherwise healthy stream. Callers that care
//! can still ask [`PacketReader::is_exhausted`] afterwards.
//!
//! ## Layouts
//!
//! | type      | bytes                                           |
//! |-----------|-------------------------------------------------|
//! | integers  | fixed width, little-endian                      |
//! | `f32/f64` | IEEE-754, little-endian                         |
//! | `bool`    | one byte, `0` or `1` (any non-zero reads `true`)|
//! | `String`  | `u16` byte length, then UTF-8 bytes             |
//! | `Vec<T>`  | `u16` count, then `count` elements              |
//! | map       | `u16` count, then `key, value` pairs            |

use std::collections::BTreeMap;

/// Largest count or byte length a `u16` prefix can describe.
const MAX_PREFIXED: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// PacketWriter
// ---------------------------------------------------------------------------

/// Appends fields to a growable payload buffer.
///
/// Every `write_*` method returns `&mut Self` so calls can be chained:
///
/// ```rust
/// use mystwire_protocol::PacketWriter;
///
/// let mut w = PacketWriter::new();
/// w.write_u32(7).write_str("Testchar").write_bool(true);
/// assert_eq!(w.len(), 4 + 2 + 8 + 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f64(&mut self, value: f64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.buf.push(u8::from(value));
        self
    }

    /// Writes a `u16` length prefix followed by the UTF-8 bytes.
    ///
    /// Text longer than 65535 bytes is cut at the last character boundary
    /// that fits, so the prefix always matches what follows.
    pub fn write_str(&mut self, value: &str) -> &mut Self {
        let mut end = value.len().min(MAX_PREFIXED);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        let bytes = &value.as_bytes()[..end];
        self.write_u16(bytes.len() as u16);
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Writes an integer map in the order the iterator yields it.
    pub fn write_map<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let count_at = self.buf.len();
        self.write_u16(0);
        let mut count: u16 = 0;
        for (key, value) in entries.into_iter().take(MAX_PREFIXED) {
            self.write_i32(key).write_i32(value);
            count += 1;
        }
        self.buf[count_at..count_at + 2].copy_from_slice(&count.to_le_bytes());
        self
    }

    /// Writes any [`Wire`] value.
    pub fn write<T: Wire>(&mut self, value: &T) -> &mut Self {
        value.write_to(self);
        self
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrows the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer and returns the payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// PacketReader
// ---------------------------------------------------------------------------

/// Reads fields from a payload with a forward-only cursor.
///
/// No method on this type can fail. When fewer bytes remain than a field
/// needs, the read returns zero (or an empty value) and the cursor moves
/// to the end of the buffer, so every later read also returns zero.
///
/// ```rust
/// use mystwire_protocol::PacketReader;
///
/// let mut r = PacketReader::new(&[0x2a, 0x00]);
/// assert_eq!(r.read_u16(), 42);
/// assert_eq!(r.read_u32(), 0); // underrun
/// assert!(r.is_exhausted());
/// ```
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` once the cursor sits at the end of the buffer.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Takes exactly `N` bytes, or parks the cursor at the end.
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N);
        match bytes.and_then(|b| <[u8; N]>::try_from(b).ok()) {
            Some(array) => {
                self.pos += N;
                Some(array)
            }
            None => {
                self.pos = self.data.len();
                None
            }
        }
    }

    pub fn read_u8(&mut self) -> u8 {
        self.take::<1>().map(u8::from_le_bytes).unwrap_or_default()
    }

    pub fn read_i8(&mut self) -> i8 {
        self.take::<1>().map(i8::from_le_bytes).unwrap_or_default()
    }

    pub fn read_u16(&mut self) -> u16 {
        self.take::<2>().map(u16::from_le_bytes).unwrap_or_default()
    }

    pub fn read_i16(&mut self) -> i16 {
        self.take::<2>().map(i16::from_le_bytes).unwrap_or_default()
    }

    pub fn read_u32(&mut self) -> u32 {
        self.take::<4>().map(u32::from_le_bytes).unwrap_or_default()
    }

    pub fn read_i32(&mut self) -> i32 {
        self.take::<4>().map(i32::from_le_bytes).unwrap_or_default()
    }

    pub fn read_u64(&mut self) -> u64 {
        self.take::<8>().map(u64::from_le_bytes).unwrap_or_default()
    }

    pub fn read_i64(&mut self) -> i64 {
        self.take::<8>().map(i64::from_le_bytes).unwrap_or_default()
    }

    pub fn read_f32(&mut self) -> f32 {
        self.take::<4>().map(f32::from_le_bytes).unwrap_or_default()
    }

    pub fn read_f64(&mut self) -> f64 {
        self.take::<8>().map(f64::from_le_bytes).unwrap_or_default()
    }

    pub fn read_bool(&mut self) -> bool {
        self.read_u8() != 0
    }

    /// Reads a length-prefixed string.
    ///
    /// A length that runs past the buffer yields `""` and exhausts the
    /// reader. Invalid UTF-8 is replaced rather than rejected.
    pub fn read_string(&mut self) -> String {
        let len = usize::from(self.read_u16());
        match self.data.get(self.pos..self.pos + len) {
            Some(bytes) => {
                self.pos += len;
                String::from_utf8_lossy(bytes).into_owned()
            }
            None => {
                self.pos = self.data.len();
                String::new()
            }
        }
    }

    /// Reads an integer map. A repeated key keeps the last value seen.
    pub fn read_map(&mut self) -> BTreeMap<i32, i32> {
        let count = self.read_u16();
        let mut map = BTreeMap::new();
        for _ in 0..count {
            if self.is_exhausted() {
                break;
            }
            let key = self.read_i32();
            let value = self.read_i32();
            map.insert(key, value);
        }
        map
    }

    /// Reads any [`Wire`] value.
    pub fn read<T: Wire>(&mut self) -> T {
        T::read_from(self)
    }
}

// ---------------------------------------------------------------------------
// Wire
// ---------------------------------------------------------------------------

/// A type with a fixed byte layout on the wire.
///
/// `read_from` must follow the reader's rules: it never fails and falls
/// back to zero values when the payload runs short.
pub trait Wire: Sized {
    fn write_to(&self, w: &mut PacketWriter);
    fn read_from(r: &mut PacketReader<'_>) -> Self;
}

macro_rules! scalar_wire {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Wire for $ty {
                fn write_to(&self, w: &mut PacketWriter) {
                    w.$write(*self);
                }

                fn read_from(r: &mut PacketReader<'_>) -> Self {
                    r.$read()
                }
            }
        )*
    };
}

scalar_wire! {
    u8 => write_u8, read_u8;
    i8 => write_i8, read_i8;
    u16 => write_u16, read_u16;
    i16 => write_i16, read_i16;
    u32 => write_u32, read_u32;
    i32 => write_i32, read_i32;
    u64 => write_u64, read_u64;
    i64 => write_i64, read_i64;
    f32 => write_f32, read_f32;
    f64 => write_f64, read_f64;
    bool => write_bool, read_bool;
}

impl Wire for String {
    fn write_to(&self, w: &mut PacketWriter) {
        w.write_str(self);
    }

    fn read_from(r: &mut PacketReader<'_>) -> Self {
        r.read_string()
    }
}

impl Wire for BTreeMap<i32, i32> {
    fn write_to(&self, w: &mut PacketWriter) {
        w.write_map(self.iter().map(|(k, v)| (*k, *v)));
    }

    fn read_from(r: &mut PacketReader<'_>) -> Self {
        r.read_map()
    }
}

impl<A: Wire, B: Wire> Wire for (A, B) {
    fn write_to(&self, w: &mut PacketWriter) {
        self.0.write_to(w);
        self.1.write_to(w);
    }

    fn read_from(r: &mut PacketReader<'_>) -> Self {
        let a = A::read_from(r);
        let b = B::read_from(r);
        (a, b)
    }
}

/// `u16` count followed by the elements.
///
/// Decoding stops early once the reader is exhausted, so a corrupt count
/// cannot conjure thousands of zeroed entries out of an empty tail.
impl<T: Wire> Wire for Vec<T> {
    fn write_to(&self, w: &mut PacketWriter) {
        let count = self.len().min(MAX_PREFIXED);
        w.write_u16(count as u16);
        for item in &self[..count] {
            item.write_to(w);
        }
    }

    fn read_from(r: &mut PacketReader<'_>) -> Self {
        let count = r.read_u16();
        let mut items = Vec::with_capacity(usize::from(count).min(r.remaining()));
        for _ in 0..count {
            if r.is_exhausted() {
                break;
            }
            items.push(T::read_from(r));
        }
        items
    }
}
