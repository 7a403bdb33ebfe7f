#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    rawbytes::{convert_to_vec, try_convert_from, BinaryEnum, BinaryObject, Params},
};

#[repr(u8)]
#[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Kind {
    #[default]
    Plain = 0,
    Tagged = 1,
    Nested = 7,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
#[binary(endianness = "big")]
struct Inner {
    #[binary(member(size = 3, sign = "signed"))]
    delta: i128,
    #[binary(member(null_terminated))]
    name: String,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
struct Outer {
    #[binary(exact(data = "FZ", encoding = "us-ascii"), member)]
    kind: Kind,
    #[binary(member(size = 6, encoding = "utf-16BE", trim_chars = "\0"))]
    label: String,
    #[binary(padding(size = 1), member(endianness = "little"))]
    count: u32,
    #[binary(member)]
    inner: Inner,
    #[binary(member(null_terminated, encoding = "iso-8859-1"))]
    note: String,
}

macro_rules! fuzz_roundtrip {
    ($data:expr, $params:expr, $ty:ty) => {
        if let Some((value, _)) = try_convert_from::<$ty>($data, $params) {
            let bytes = convert_to_vec(&value, $params).expect("decoded value should encode");
            let (roundtrip, used) =
                try_convert_from::<$ty>(&bytes, $params).expect("encoded value should decode");
            assert_eq!(used, bytes.len());
            assert_eq!(value, roundtrip, "roundtrip failed for {}", stringify!($ty));
        }
    };
}

fuzz_target!(|data: &[u8]| {
    let params = Params::default();
    fuzz_roundtrip!(data, &params, Kind);
    fuzz_roundtrip!(data, &params, Inner);
    fuzz_roundtrip!(data, &params, Outer);
});
