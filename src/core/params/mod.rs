/*!
Typed key/value parameters for crossing the provider boundary.

A `Param` is one keyed slot whose value is a tagged union over the four
supported shapes: an inline scalar, a caller-owned destination buffer, a
scalar output binding, and a zero-copy borrowed view. A `Params` array is
the order-preserving dictionary providers and callers exchange.

Values are borrowed, never owned: the lifetime parameter ties every slot to
caller memory, so a callee cannot retain a parameter past the call without
an explicit copy. Every accessor re-validates the key and the tag before it
touches anything.
*/

pub mod keys;

use crate::core::error::{push, reject, Error, Result};

/// Upper bound on entries examined by any scan over a parameter array.
///
/// Defends lookups against degenerate or hostile arrays.
pub const MAX_PARAM_COUNT: usize = 1000;

/// Tag identifying the shape of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Fixed-size unsigned scalar, stored inline
    Uint32,
    /// Caller-owned destination buffer; the slice length is the capacity
    Octets,
    /// Output binding for a scalar the callee writes back
    Uint32Out,
    /// Borrowed read-only view, rebindable without copying
    OctetsRef,
}

/// The value held by a parameter slot
#[derive(Debug)]
pub enum ParamValue<'a> {
    Uint32(u32),
    Octets(&'a mut [u8]),
    Uint32Out(&'a mut u32),
    OctetsRef(&'a [u8]),
}

impl ParamValue<'_> {
    fn tag(&self) -> ParamType {
        match self {
            ParamValue::Uint32(_) => ParamType::Uint32,
            ParamValue::Octets(_) => ParamType::Octets,
            ParamValue::Uint32Out(_) => ParamType::Uint32Out,
            ParamValue::OctetsRef(_) => ParamType::OctetsRef,
        }
    }
}

/// One typed, keyed value slot
#[derive(Debug)]
pub struct Param<'a> {
    key: i32,
    value: ParamValue<'a>,
    use_len: usize,
}

impl<'a> Param<'a> {
    fn bind(key: i32, value: ParamValue<'a>) -> Result<Self> {
        if key == 0 {
            reject!(Error::InvalidKey);
        }
        // Fresh binding, not a value update.
        Ok(Self { key, value, use_len: 0 })
    }

    /// Bind a fresh scalar slot
    pub fn uint32(key: i32, value: u32) -> Result<Self> {
        Self::bind(key, ParamValue::Uint32(value))
    }

    /// Bind a fresh buffer slot to caller memory; capacity is `buf.len()`
    pub fn octets(key: i32, buf: &'a mut [u8]) -> Result<Self> {
        Self::bind(key, ParamValue::Octets(buf))
    }

    /// Bind a fresh scalar output slot to caller memory
    pub fn uint32_out(key: i32, out: &'a mut u32) -> Result<Self> {
        Self::bind(key, ParamValue::Uint32Out(out))
    }

    /// Bind a fresh zero-copy read-only view
    pub fn octets_ref(key: i32, data: &'a [u8]) -> Result<Self> {
        Self::bind(key, ParamValue::OctetsRef(data))
    }

    /// The slot's key
    pub fn key(&self) -> i32 {
        self.key
    }

    /// The slot's value tag
    pub fn param_type(&self) -> ParamType {
        self.value.tag()
    }

    /// Length actually consumed or produced by the last write
    pub fn use_len(&self) -> usize {
        self.use_len
    }

    /// Declared capacity of the slot
    pub fn capacity(&self) -> usize {
        match &self.value {
            ParamValue::Uint32(_) | ParamValue::Uint32Out(_) => size_of::<u32>(),
            ParamValue::Octets(buf) => buf.len(),
            ParamValue::OctetsRef(data) => data.len(),
        }
    }

    fn mismatch(&self) -> Error {
        push(Error::Mismatch { key: self.key })
    }

    /// Store a scalar into a `Uint32` slot
    pub fn set_uint32(&mut self, value: u32) -> Result<()> {
        match &mut self.value {
            ParamValue::Uint32(slot) => {
                *slot = value;
                self.use_len = size_of::<u32>();
                Ok(())
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Copy `data` into the destination buffer of an `Octets` slot
    pub fn set_octets(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.value {
            ParamValue::Octets(buf) => {
                if data.len() > buf.len() {
                    reject!(Error::InvalidArgument(format!(
                        "octets value of {} bytes exceeds capacity {}",
                        data.len(),
                        buf.len()
                    )));
                }
                buf[..data.len()].copy_from_slice(data);
                self.use_len = data.len();
                Ok(())
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Rebind an `OctetsRef` slot to a new view, without copying
    pub fn rebind_octets(&mut self, view: &'a [u8]) -> Result<()> {
        match &mut self.value {
            ParamValue::OctetsRef(slot) => {
                self.use_len = view.len();
                *slot = view;
                Ok(())
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Write a scalar through a `Uint32Out` binding (callee side)
    pub fn set_uint32_out(&mut self, value: u32) -> Result<()> {
        match &mut self.value {
            ParamValue::Uint32Out(out) => {
                **out = value;
                self.use_len = size_of::<u32>();
                Ok(())
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Read the scalar of a `Uint32` slot
    pub fn get_uint32(&self) -> Result<u32> {
        match &self.value {
            ParamValue::Uint32(value) => Ok(*value),
            _ => Err(self.mismatch()),
        }
    }

    /// Number of meaningful bytes in an `Octets` slot: what the last set
    /// recorded, or the full capacity for a slot never written through
    /// the container.
    fn effective_len(&self, buf: &[u8]) -> usize {
        if self.use_len > 0 { self.use_len } else { buf.len() }
    }

    /// Copy the meaningful bytes of an `Octets` slot into `dest`; returns
    /// the copied length. `dest` must be at least that large.
    pub fn get_octets(&self, dest: &mut [u8]) -> Result<usize> {
        match &self.value {
            ParamValue::Octets(buf) => {
                let len = self.effective_len(buf);
                if dest.len() < len {
                    reject!(Error::InvalidArgument(format!(
                        "destination of {} bytes too small for {} byte value",
                        dest.len(),
                        len
                    )));
                }
                dest[..len].copy_from_slice(&buf[..len]);
                Ok(len)
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Borrow the view of an `OctetsRef` slot, without copying
    pub fn get_octets_ref(&self) -> Result<&[u8]> {
        match &self.value {
            ParamValue::OctetsRef(data) => Ok(data),
            _ => Err(self.mismatch()),
        }
    }

    /// Read the current value behind a `Uint32Out` binding
    pub fn get_uint32_binding(&self) -> Result<u32> {
        match &self.value {
            ParamValue::Uint32Out(out) => Ok(**out),
            _ => Err(self.mismatch()),
        }
    }
}

/// Ordered parameter dictionary; first match wins on lookup
#[derive(Debug, Default)]
pub struct Params<'a> {
    entries: Vec<Param<'a>>,
}

impl<'a> Params<'a> {
    /// Create an empty parameter array
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append a slot, up to [`MAX_PARAM_COUNT`] live entries
    pub fn push(&mut self, param: Param<'a>) -> Result<()> {
        if self.entries.len() >= MAX_PARAM_COUNT {
            reject!(Error::InvalidArgument(format!(
                "parameter array full ({MAX_PARAM_COUNT} entries)"
            )));
        }
        self.entries.push(param);
        Ok(())
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the array has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Param<'a>> {
        self.entries.iter()
    }

    /// Find the first entry with `key`, scanning at most
    /// [`MAX_PARAM_COUNT`] entries
    pub fn find(&self, key: i32) -> Result<&Param<'a>> {
        if key == 0 {
            reject!(Error::InvalidKey);
        }
        self.entries
            .iter()
            .take(MAX_PARAM_COUNT)
            .find(|p| p.key == key)
            .ok_or_else(|| push(Error::NotFound(key)))
    }

    /// Mutable variant of [`find`](Self::find)
    pub fn find_mut(&mut self, key: i32) -> Result<&mut Param<'a>> {
        if key == 0 {
            reject!(Error::InvalidKey);
        }
        self.entries
            .iter_mut()
            .take(MAX_PARAM_COUNT)
            .find(|p| p.key == key)
            .ok_or_else(|| push(Error::NotFound(key)))
    }

    /// Store a scalar into the `Uint32` slot at `key`
    pub fn set_uint32(&mut self, key: i32, value: u32) -> Result<()> {
        self.find_mut(key)?.set_uint32(value)
    }

    /// Copy `data` into the `Octets` slot at `key`
    pub fn set_octets(&mut self, key: i32, data: &[u8]) -> Result<()> {
        self.find_mut(key)?.set_octets(data)
    }

    /// Rebind the `OctetsRef` slot at `key` to a new view
    pub fn rebind_octets(&mut self, key: i32, view: &'a [u8]) -> Result<()> {
        self.find_mut(key)?.rebind_octets(view)
    }

    /// Write through the `Uint32Out` binding at `key`
    pub fn set_uint32_out(&mut self, key: i32, value: u32) -> Result<()> {
        self.find_mut(key)?.set_uint32_out(value)
    }

    /// Read the scalar at `key`
    pub fn get_uint32(&self, key: i32) -> Result<u32> {
        self.find(key)?.get_uint32()
    }

    /// Copy the octets at `key` into `dest`; returns the copied length
    pub fn get_octets(&self, key: i32, dest: &mut [u8]) -> Result<usize> {
        self.find(key)?.get_octets(dest)
    }

    /// Borrow the view at `key`, without copying
    pub fn get_octets_ref(&self, key: i32) -> Result<&[u8]> {
        self.find(key)?.get_octets_ref()
    }
}

impl<'a> FromIterator<Param<'a>> for Params<'a> {
    fn from_iter<I: IntoIterator<Item = Param<'a>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
