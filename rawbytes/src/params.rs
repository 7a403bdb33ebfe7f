//! Conversion parameters.
//!
//! A [`Params`] value travels down every recursive conversion step. It is never
//! mutated in place: each dispatch boundary derives a new value with the fields
//! it changes, so a callee cannot alter what its caller sees.
use {
    once_cell::sync::Lazy,
    std::{any::type_name, borrow::Cow},
    tracing::debug,
};

/// Byte order for multi-byte values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Endianness {
    /// The host's native order.
    #[default]
    SystemDefault,
    Little,
    Big,
}

static NATIVE: Lazy<Endianness> = Lazy::new(|| {
    let native = if u16::from_ne_bytes([1, 0]) == 1 {
        Endianness::Little
    } else {
        Endianness::Big
    };
    debug!(?native, "resolved native byte order");
    native
});

impl Endianness {
    /// The host's byte order, detected on first use and cached for the process.
    pub fn native() -> Self {
        *NATIVE
    }

    /// Replace [`Endianness::SystemDefault`] with the concrete native order.
    pub fn resolve(self) -> Self {
        match self {
            Endianness::SystemDefault => Self::native(),
            concrete => concrete,
        }
    }

    #[inline]
    pub fn is_little(self) -> bool {
        self.resolve() == Endianness::Little
    }
}

/// Signedness preference for arbitrary-width integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Sign {
    /// Defer to the target type.
    #[default]
    Default,
    Signed,
    Unsigned,
}

impl Sign {
    /// Whether to treat the value as signed. `inherent` is the target type's own
    /// signedness when it has one; without it the value is unsigned.
    pub fn is_signed(self, inherent: Option<bool>) -> bool {
        match self {
            Sign::Signed => true,
            Sign::Unsigned => false,
            Sign::Default => inherent.unwrap_or(false),
        }
    }
}

/// Per-member overrides. `None` inherits the enclosing value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberOptions {
    pub size: Option<usize>,
    pub endianness: Option<Endianness>,
    pub sign: Option<Sign>,
    pub encoding: Option<Cow<'static, str>>,
    pub null_terminated: Option<bool>,
    pub trim_large_data: Option<bool>,
    pub trim_chars: Option<Cow<'static, str>>,
}

impl MemberOptions {
    pub const fn new() -> Self {
        Self {
            size: None,
            endianness: None,
            sign: None,
            encoding: None,
            null_terminated: None,
            trim_large_data: None,
            trim_chars: None,
        }
    }

    /// Confine the member to exactly `size` bytes.
    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    pub fn sign(mut self, sign: Sign) -> Self {
        self.sign = Some(sign);
        self
    }

    pub fn encoding(mut self, encoding: impl Into<Cow<'static, str>>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn null_terminated(mut self, null_terminated: bool) -> Self {
        self.null_terminated = Some(null_terminated);
        self
    }

    pub fn trim_large_data(mut self, trim_large_data: bool) -> Self {
        self.trim_large_data = Some(trim_large_data);
        self
    }

    pub fn trim_chars(mut self, trim_chars: impl Into<Cow<'static, str>>) -> Self {
        self.trim_chars = Some(trim_chars.into());
        self
    }
}

/// Configuration threaded through a conversion.
///
/// ```
/// # use rawbytes::{Endianness, Params};
/// let params = Params::default()
///     .with_endianness(Endianness::Big)
///     .with_encoding("utf-16")
///     .with_null_terminated(true);
/// assert_eq!(params.encoding(), "utf-16");
/// assert_eq!(Params::default().encoding(), "utf-8");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Params {
    endianness: Endianness,
    sign: Sign,
    encoding: Cow<'static, str>,
    null_terminated: bool,
    trim_large_data: bool,
    trim_chars: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(skip))]
    target_type: &'static str,
    #[cfg_attr(feature = "serde", serde(skip))]
    fixed_width: Option<usize>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            endianness: Endianness::SystemDefault,
            sign: Sign::Default,
            encoding: Cow::Borrowed("utf-8"),
            null_terminated: false,
            trim_large_data: false,
            trim_chars: Cow::Borrowed(""),
            target_type: "",
            fixed_width: None,
        }
    }
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// The configured byte order with [`Endianness::SystemDefault`] resolved.
    pub fn byte_order(&self) -> Endianness {
        self.endianness.resolve()
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn null_terminated(&self) -> bool {
        self.null_terminated
    }

    pub fn trim_large_data(&self) -> bool {
        self.trim_large_data
    }

    pub fn trim_chars(&self) -> &str {
        &self.trim_chars
    }

    /// Name of the type the current conversion step targets.
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// Exact byte width imposed by an enclosing sized member, if any.
    pub fn fixed_width(&self) -> Option<usize> {
        self.fixed_width
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn with_sign(mut self, sign: Sign) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<Cow<'static, str>>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn with_null_terminated(mut self, null_terminated: bool) -> Self {
        self.null_terminated = null_terminated;
        self
    }

    pub fn with_trim_large_data(mut self, trim_large_data: bool) -> Self {
        self.trim_large_data = trim_large_data;
        self
    }

    pub fn with_trim_chars(mut self, trim_chars: impl Into<Cow<'static, str>>) -> Self {
        self.trim_chars = trim_chars.into();
        self
    }

    pub fn with_fixed_width(mut self, fixed_width: Option<usize>) -> Self {
        self.fixed_width = fixed_width;
        self
    }

    /// Copy of these parameters aimed at `T`.
    pub fn retarget<T: ?Sized>(&self) -> Self {
        Self {
            target_type: type_name::<T>(),
            ..self.clone()
        }
    }

    /// Apply the overrides set in `options`; unset ones inherit from `self`.
    pub fn merge(&self, options: &MemberOptions) -> Self {
        let mut merged = self.clone();
        if let Some(endianness) = options.endianness {
            merged.endianness = endianness;
        }
        if let Some(sign) = options.sign {
            merged.sign = sign;
        }
        if let Some(encoding) = &options.encoding {
            merged.encoding = encoding.clone();
        }
        if let Some(null_terminated) = options.null_terminated {
            merged.null_terminated = null_terminated;
        }
        if let Some(trim_large_data) = options.trim_large_data {
            merged.trim_large_data = trim_large_data;
        }
        if let Some(trim_chars) = &options.trim_chars {
            merged.trim_chars = trim_chars.clone();
        }
        merged.fixed_width = options.size;
        merged
    }

    /// Strip the configured trim characters from both ends of `text`.
    pub fn trim<'s>(&self, text: &'s str) -> &'s str {
        if self.trim_chars.is_empty() {
            return text;
        }
        text.trim_matches(|c: char| self.trim_chars.contains(c))
    }
}
