use {
    criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    malachite::Integer,
    rawbytes::{
        binary_size, convert_from, convert_from_reader, convert_to, convert_to_vec,
        convert_to_writer, BinaryEnum, BinaryObject, Endianness, Params,
    },
};

#[repr(u16)]
#[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Channel {
    #[default]
    Left = 1,
    Right = 2,
    Both = 3,
}

#[derive(BinaryObject, Clone, Debug, Default, PartialEq)]
#[binary(endianness = "little")]
struct SampleHeader {
    #[binary(exact(data = "SMPL", encoding = "us-ascii"), member)]
    id: u32,
    #[binary(member(endianness = "big"))]
    channel: Channel,
    #[binary(member)]
    rate: u32,
    #[binary(member(size = 16, encoding = "utf-16", trim_chars = "\0"))]
    name: String,
    #[binary(padding(size = 4), member)]
    frames: u64,
    #[binary(member(size = 12, sign = "signed"))]
    offset: i128,
}

fn header() -> SampleHeader {
    SampleHeader {
        id: 0xDEAD_BEEF,
        channel: Channel::Both,
        rate: 48_000,
        name: "kick".to_owned(),
        frames: 1 << 20,
        offset: -12_345_678_901,
    }
}

/// Verify the two directions agree before timing them.
fn verified_bytes(data: &SampleHeader, params: &Params) -> Vec<u8> {
    let bytes = convert_to_vec(data, params).unwrap();
    assert_eq!(binary_size(data, params).unwrap(), bytes.len());
    assert_eq!(&convert_from::<SampleHeader>(&bytes, params).unwrap(), data);
    bytes
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("Primitives");
    group.throughput(Throughput::Elements(1));

    let data = 0xDEAD_BEEF_CAFE_BABEu64;
    for endianness in [Endianness::Little, Endianness::Big] {
        let params = Params::default().with_endianness(endianness);
        let bytes = convert_to_vec(&data, &params).unwrap();

        group.bench_function(format!("u64/{endianness:?}/convert_to"), |b| {
            let mut buffer = [0u8; 8];
            b.iter(|| convert_to(black_box(&data), black_box(&mut buffer), &params).unwrap());
        });

        group.bench_function(format!("u64/{endianness:?}/convert_from"), |b| {
            b.iter(|| convert_from::<u64>(black_box(&bytes), &params).unwrap());
        });
    }

    group.finish();
}

fn bench_object(c: &mut Criterion) {
    let mut group = c.benchmark_group("SampleHeader");
    group.throughput(Throughput::Elements(1));

    let params = Params::default();
    let data = header();
    let bytes = verified_bytes(&data, &params);

    group.bench_function("convert_to", |b| {
        let mut buffer = vec![0u8; bytes.len()];
        b.iter(|| convert_to(black_box(&data), black_box(&mut buffer), &params).unwrap());
    });

    group.bench_function("convert_to_vec", |b| {
        b.iter(|| convert_to_vec(black_box(&data), &params).unwrap());
    });

    group.bench_function("binary_size", |b| {
        b.iter(|| binary_size(black_box(&data), &params).unwrap());
    });

    group.bench_function("convert_from", |b| {
        b.iter(|| convert_from::<SampleHeader>(black_box(&bytes), &params).unwrap());
    });

    group.bench_function("convert_from_reader", |b| {
        b.iter(|| convert_from_reader::<SampleHeader, _>(black_box(bytes.as_slice()), &params).unwrap());
    });

    group.bench_function("convert_to_writer", |b| {
        let mut sink = Vec::<u8>::with_capacity(bytes.len());
        b.iter(|| {
            sink.clear();
            convert_to_writer(black_box(&data), &mut sink, &params).unwrap()
        });
    });

    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("String");

    for encoding in ["utf-8", "utf-16", "utf-32BE", "us-ascii"] {
        for len in [16, 256, 4096] {
            let text: String = "abcdefghijklmnop".chars().cycle().take(len).collect();
            let params = Params::default()
                .with_encoding(encoding)
                .with_null_terminated(true);
            let bytes = convert_to_vec(&text, &params).unwrap();
            group.throughput(Throughput::Bytes(bytes.len() as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("{encoding}/convert_to_vec"), len),
                &text,
                |b, t| b.iter(|| convert_to_vec(black_box(t), &params).unwrap()),
            );

            group.bench_with_input(
                BenchmarkId::new(format!("{encoding}/convert_from"), len),
                &bytes,
                |b, s| b.iter(|| convert_from::<String>(black_box(s), &params).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_arbitrary_int(c: &mut Criterion) {
    let mut group = c.benchmark_group("Integer");

    for bits in [64u64, 512, 4096] {
        let value = -(Integer::from(1) << bits) + Integer::from(12_345);
        let params = Params::default().with_endianness(Endianness::Big);
        let bytes = convert_to_vec(&value, &params).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("convert_to_vec", bits),
            &value,
            |b, v| b.iter(|| convert_to_vec(black_box(v), &params).unwrap()),
        );

        group.bench_with_input(
            BenchmarkId::new("convert_from", bits),
            &bytes,
            |b, s| b.iter(|| convert_from::<Integer>(black_box(s), &params).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_primitives,
    bench_object,
    bench_strings,
    bench_arbitrary_int,
);

criterion_main!(benches);
