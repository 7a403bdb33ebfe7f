//! Composite objects: member descriptors and the member-by-member dispatcher.
//!
//! A composite is described by an [`ObjectDescriptor`], an ordered list of
//! members. Descriptors are normally generated by `#[derive(BinaryObject)]`, but
//! can be assembled by hand with [`ObjectDescriptor::builder`]:
//!
//! ```
//! # use rawbytes::{
//! #     convert_from, convert_to_vec, Binary, BinaryObject, Endianness, Handler,
//! #     MemberOptions, ObjectDescriptor, Params,
//! # };
//! #[derive(Debug, Default, PartialEq)]
//! struct Header {
//!     version: u16,
//!     length: u32,
//! }
//!
//! impl BinaryObject for Header {
//!     fn descriptor() -> ObjectDescriptor<Self> {
//!         ObjectDescriptor::builder()
//!             .endianness(Endianness::Big)
//!             .exact("HDR", "us-ascii")
//!             .member("version", MemberOptions::new(), |h: &Self| &h.version, |h, v| h.version = v)
//!             .padding(2)
//!             .member("length", MemberOptions::new(), |h: &Self| &h.length, |h, v| h.length = v)
//!             .build()
//!     }
//!
//!     fn instantiate() -> Option<Self> {
//!         Some(Self::default())
//!     }
//! }
//!
//! impl Binary for Header {
//!     fn composite() -> Option<Handler<Self>> {
//!         Some(Handler::composite())
//!     }
//! }
//!
//! let header = Header { version: 2, length: 512 };
//! let bytes = convert_to_vec(&header, &Params::default()).unwrap();
//! assert_eq!(bytes, b"HDR\x00\x02\x00\x00\x00\x00\x02\x00");
//! assert_eq!(convert_from::<Header>(&bytes, &Params::default()).unwrap(), header);
//! ```
use {
    crate::{
        encoding,
        error::{construction, custom_converter, literal_mismatch, unknown_encoding, Result},
        io::{Reader, SliceReader, SliceWriter, Writer},
        params::{Endianness, MemberOptions, Params},
        schema::{self, Binary, Handler, Strategy},
    },
    std::borrow::Cow,
    tracing::{debug, trace},
};

/// A type converted member by member.
pub trait BinaryObject: Sized + 'static {
    /// The type's member layout.
    fn descriptor() -> ObjectDescriptor<Self>;

    /// A fresh instance for members to be read into.
    ///
    /// `None` aborts the read before any input is consumed.
    fn instantiate() -> Option<Self>;
}

/// Host-supplied conversion for [`MemberKind::Custom`] members.
///
/// Both directions see exactly the member's declared size. Returning `false`
/// fails the whole object.
pub trait BinaryCustom {
    fn read_custom(&mut self, data: &[u8], id: Option<&str>, params: &Params) -> bool;

    fn write_custom(&self, dst: &mut [u8], id: Option<&str>, params: &Params) -> bool;
}

pub type ReadMember<T> = Box<dyn Fn(&mut T, &mut dyn Reader, &Params) -> Result<()> + Send + Sync>;
pub type WriteMember<T> = Box<dyn Fn(&T, &mut dyn Writer, &Params) -> Result<()> + Send + Sync>;
pub type ReadCustom<T> = fn(&mut T, &[u8], Option<&str>, &Params) -> bool;
pub type WriteCustom<T> = fn(&T, &mut [u8], Option<&str>, &Params) -> bool;

/// What a member contributes to the binary form.
pub enum MemberKind<T> {
    /// A field converted through the value dispatcher.
    Value {
        options: MemberOptions,
        read: ReadMember<T>,
        write: WriteMember<T>,
    },
    /// `size` bytes skipped on read and zeroed on write.
    Padding { size: usize },
    /// A literal that must appear verbatim.
    Exact {
        data: Cow<'static, str>,
        encoding: Cow<'static, str>,
    },
    /// A fixed-size region handled by [`BinaryCustom`].
    Custom {
        size: usize,
        id: Option<&'static str>,
        read: ReadCustom<T>,
        write: WriteCustom<T>,
    },
}

pub struct Member<T> {
    name: &'static str,
    order: i64,
    kind: MemberKind<T>,
}

impl<T> Member<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn kind(&self) -> &MemberKind<T> {
        &self.kind
    }

    /// The fixed number of bytes the member occupies, if it has one.
    pub fn size(&self) -> Option<usize> {
        match &self.kind {
            MemberKind::Value { options, .. } => options.size,
            MemberKind::Padding { size } | MemberKind::Custom { size, .. } => Some(*size),
            MemberKind::Exact { .. } => None,
        }
    }
}

/// The ordered member layout of a composite type.
pub struct ObjectDescriptor<T> {
    endianness: Option<Endianness>,
    members: Vec<Member<T>>,
}

impl<T> ObjectDescriptor<T> {
    pub fn builder() -> ObjectBuilder<T> {
        ObjectBuilder {
            endianness: None,
            members: Vec::new(),
        }
    }

    /// Byte order applied to every member that does not set its own.
    pub fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }

    /// Members in conversion order.
    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }
}

/// Assembles an [`ObjectDescriptor`].
///
/// Members are converted in ascending order key. Each member's key defaults to
/// its declaration index; [`ObjectBuilder::order`] overrides the key of the
/// member declared last. Equal keys keep declaration order.
pub struct ObjectBuilder<T> {
    endianness: Option<Endianness>,
    members: Vec<Member<T>>,
}

impl<T: 'static> ObjectBuilder<T> {
    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    fn push(mut self, name: &'static str, kind: MemberKind<T>) -> Self {
        let order = self.members.len() as i64;
        self.members.push(Member { name, order, kind });
        self
    }

    /// A field of type `F`, reached through `get` and stored through `set`.
    pub fn member<F, G, S>(self, name: &'static str, options: MemberOptions, get: G, set: S) -> Self
    where
        F: Binary + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        let read: ReadMember<T> = Box::new(
            move |object: &mut T, reader: &mut dyn Reader, params: &Params| {
                set(object, schema::read::<F>(reader, params)?);
                Ok(())
            },
        );
        let write: WriteMember<T> = Box::new(
            move |object: &T, writer: &mut dyn Writer, params: &Params| {
                schema::write(get(object), writer, params)
            },
        );
        self.push(
            name,
            MemberKind::Value {
                options,
                read,
                write,
            },
        )
    }

    pub fn padding(self, size: usize) -> Self {
        self.push("<padding>", MemberKind::Padding { size })
    }

    /// A literal `data`, stored in `encoding`.
    pub fn exact(
        self,
        data: impl Into<Cow<'static, str>>,
        encoding: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.push(
            "<exact>",
            MemberKind::Exact {
                data: data.into(),
                encoding: encoding.into(),
            },
        )
    }

    /// Set the order key of the most recently declared member.
    pub fn order(mut self, order: i64) -> Self {
        if let Some(member) = self.members.last_mut() {
            member.order = order;
        }
        self
    }

    pub fn build(mut self) -> ObjectDescriptor<T> {
        self.members.sort_by_key(|member| member.order);
        ObjectDescriptor {
            endianness: self.endianness,
            members: self.members,
        }
    }
}

impl<T: BinaryCustom + 'static> ObjectBuilder<T> {
    /// A `size`-byte region converted by `T`'s [`BinaryCustom`] impl.
    pub fn custom(self, name: &'static str, size: usize, id: Option<&'static str>) -> Self {
        self.push(
            name,
            MemberKind::Custom {
                size,
                id,
                read: T::read_custom,
                write: T::write_custom,
            },
        )
    }
}

fn literal_bytes(data: &str, encoding: &str) -> Result<Vec<u8>> {
    encoding::lookup(encoding)
        .ok_or_else(|| unknown_encoding(encoding))?
        .encode(data)
}

impl<T> Member<T> {
    fn read(&self, object: &mut T, reader: &mut dyn Reader, params: &Params) -> Result<()> {
        match &self.kind {
            MemberKind::Value { options, read, .. } => {
                let params = params.merge(options);
                match options.size {
                    Some(size) => {
                        let chunk = reader.take(size)?;
                        read(object, &mut SliceReader::new(&chunk), &params)
                    }
                    None => read(object, reader, &params),
                }
            }
            MemberKind::Padding { size } => Ok(reader.skip(*size)?),
            MemberKind::Exact { data, encoding } => {
                let expected = literal_bytes(data, encoding)?;
                let found = reader.peek(expected.len())?;
                if found != expected.as_slice() {
                    return Err(literal_mismatch(expected, found.to_vec()));
                }
                Ok(reader.skip(expected.len())?)
            }
            MemberKind::Custom { size, id, read, .. } => {
                let chunk = reader.take(*size)?;
                if !read(object, &chunk, *id, params) {
                    return Err(custom_converter(*id));
                }
                Ok(())
            }
        }
    }

    fn write(&self, object: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
        match &self.kind {
            MemberKind::Value { options, write, .. } => {
                let params = params.merge(options);
                match options.size {
                    Some(size) => {
                        let mut scratch = vec![0; size];
                        write(object, &mut SliceWriter::new(&mut scratch), &params)?;
                        Ok(writer.write(&scratch)?)
                    }
                    None => write(object, writer, &params),
                }
            }
            MemberKind::Padding { size } => Ok(writer.write_zeroes(*size)?),
            MemberKind::Exact { data, encoding } => {
                Ok(writer.write(&literal_bytes(data, encoding)?)?)
            }
            MemberKind::Custom { size, id, write, .. } => {
                let mut scratch = vec![0; *size];
                if !write(object, &mut scratch, *id, params) {
                    return Err(custom_converter(*id));
                }
                Ok(writer.write(&scratch)?)
            }
        }
    }
}

/// Parameters shared by every member of `descriptor`.
fn object_params<T>(descriptor: &ObjectDescriptor<T>, params: &Params) -> Params {
    let params = params.clone().with_fixed_width(None);
    match descriptor.endianness {
        Some(endianness) => params.with_endianness(endianness),
        None => params,
    }
}

fn read_object<T: BinaryObject>(reader: &mut dyn Reader, params: &Params) -> Result<T> {
    let descriptor = T::descriptor();
    let Some(mut object) = T::instantiate() else {
        return Err(construction(params.target_type()));
    };
    let params = object_params(&descriptor, params);
    let start = reader.position();
    for member in descriptor.members() {
        trace!(member = member.name, position = reader.position(), "read member");
        member
            .read(&mut object, reader, &params)
            .map_err(|err| {
                debug!(member = member.name, %err, "member read failed");
                err.in_member(member.name)
            })?;
    }
    trace!(
        type_name = params.target_type(),
        consumed = reader.position() - start,
        "read object"
    );
    Ok(object)
}

fn write_object<T: BinaryObject>(object: &T, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    let descriptor = T::descriptor();
    let params = object_params(&descriptor, params);
    let start = writer.written();
    for member in descriptor.members() {
        trace!(member = member.name, written = writer.written(), "write member");
        member.write(object, writer, &params).map_err(|err| {
            debug!(member = member.name, %err, "member write failed");
            err.in_member(member.name)
        })?;
    }
    trace!(
        type_name = params.target_type(),
        written = writer.written() - start,
        "wrote object"
    );
    Ok(())
}

impl<T: BinaryObject> Handler<T> {
    /// Composite strategy.
    pub fn composite() -> Self {
        Handler::new(Strategy::Composite, read_object::<T>, write_object::<T>)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::ErrorKind,
            io::StreamReader,
            schema::{read, write},
        },
    };

    #[derive(Debug, Default, PartialEq)]
    struct Tagged {
        label: String,
        checksum: u8,
        value: i32,
    }

    impl BinaryCustom for Tagged {
        fn read_custom(&mut self, data: &[u8], id: Option<&str>, _: &Params) -> bool {
            if id != Some("xor") {
                return false;
            }
            self.checksum = data.iter().fold(0, |acc, byte| acc ^ byte);
            true
        }

        fn write_custom(&self, dst: &mut [u8], _: Option<&str>, _: &Params) -> bool {
            match dst.first_mut() {
                Some(first) => {
                    *first = self.checksum;
                    true
                }
                None => false,
            }
        }
    }

    impl BinaryObject for Tagged {
        fn descriptor() -> ObjectDescriptor<Self> {
            ObjectDescriptor::builder()
                .endianness(Endianness::Little)
                .member(
                    "value",
                    MemberOptions::new(),
                    |t: &Self| &t.value,
                    |t, v| t.value = v,
                )
                .order(2)
                .member(
                    "label",
                    MemberOptions::new().size(4).trim_chars("\0"),
                    |t: &Self| &t.label,
                    |t, v| t.label = v,
                )
                .custom("checksum", 2, Some("xor"))
                .build()
        }

        fn instantiate() -> Option<Self> {
            Some(Self::default())
        }
    }

    impl Binary for Tagged {
        fn composite() -> Option<Handler<Self>> {
            Some(Handler::composite())
        }
    }

    #[test]
    fn order_keys_sort_stably() {
        let descriptor = Tagged::descriptor();
        let names: Vec<_> = descriptor.members().iter().map(Member::name).collect();
        assert_eq!(names, ["label", "value", "checksum"]);
        assert_eq!(descriptor.members()[0].size(), Some(4));
        assert_eq!(descriptor.endianness(), Some(Endianness::Little));
    }

    #[test]
    fn members_round_trip() {
        let value = Tagged {
            label: "ab".to_owned(),
            checksum: 0x5A,
            value: -2,
        };
        let params = Params::default().with_endianness(Endianness::Big);
        let mut out = Vec::<u8>::new();
        write(&value, &mut out, &params).unwrap();
        assert_eq!(out, [b'a', b'b', 0, 0, 0xFE, 0xFF, 0xFF, 0xFF, 0x5A, 0]);

        let mut reader = SliceReader::new(&out);
        assert_eq!(read::<Tagged>(&mut reader, &params).unwrap(), value);
        assert_eq!(reader.position(), 10);

        let mut stream = StreamReader::new(out.as_slice());
        assert_eq!(read::<Tagged>(&mut stream, &params).unwrap(), value);
    }

    #[test]
    fn failures_name_the_member() {
        let mut reader = SliceReader::new(&[b'a', b'b', 0, 0, 1]);
        let err = read::<Tagged>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
        assert_eq!(err.member(), Some("value"));

        let value = Tagged {
            label: "too long".to_owned(),
            ..Tagged::default()
        };
        let err = write(&value, &mut Vec::<u8>::new(), &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Oversize);
        assert_eq!(err.member(), Some("label"));
    }

    #[derive(Debug)]
    struct Unconstructible;

    impl BinaryObject for Unconstructible {
        fn descriptor() -> ObjectDescriptor<Self> {
            ObjectDescriptor::builder().padding(1).build()
        }

        fn instantiate() -> Option<Self> {
            None
        }
    }

    impl Binary for Unconstructible {
        fn composite() -> Option<Handler<Self>> {
            Some(Handler::composite())
        }
    }

    #[test]
    fn construction_failure_consumes_nothing() {
        let mut reader = SliceReader::new(&[0; 4]);
        let err = read::<Unconstructible>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn literal_mismatch_leaves_input() {
        #[derive(Debug)]
        struct Magic;

        impl BinaryObject for Magic {
            fn descriptor() -> ObjectDescriptor<Self> {
                ObjectDescriptor::builder().exact("ID3", "us-ascii").build()
            }

            fn instantiate() -> Option<Self> {
                Some(Magic)
            }
        }

        impl Binary for Magic {
            fn composite() -> Option<Handler<Self>> {
                Some(Handler::composite())
            }
        }

        let mut reader = SliceReader::new(b"ID4");
        let err = read::<Magic>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LiteralMismatch);
        assert_eq!(reader.position(), 0);

        let mut reader = SliceReader::new(b"ID");
        let err = read::<Magic>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LiteralMismatch);

        #[derive(Debug)]
        struct Ebcdic;

        impl BinaryObject for Ebcdic {
            fn descriptor() -> ObjectDescriptor<Self> {
                ObjectDescriptor::builder().exact("ID3", "ebcdic").build()
            }

            fn instantiate() -> Option<Self> {
                Some(Ebcdic)
            }
        }

        impl Binary for Ebcdic {
            fn composite() -> Option<Handler<Self>> {
                Some(Handler::composite())
            }
        }

        let mut reader = SliceReader::new(b"ID3");
        let err = read::<Ebcdic>(&mut reader, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEncoding);
        assert_eq!(reader.position(), 0);
        let mut out = Vec::<u8>::new();
        let err = write(&Ebcdic, &mut out, &Params::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownEncoding);
        assert!(out.is_empty());
    }
}
