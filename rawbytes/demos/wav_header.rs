//! Writes a short PCM WAV file and reads it back.
//!
//! The header is a derived object; the sample data is a plain run of `i16`s
//! pulled one at a time from the same reader.
use {
    rawbytes::{
        binary_size, convert_to_writer,
        io::{Reader, StreamReader},
        schema, BinaryEnum, BinaryObject, Endianness, Params,
    },
    std::{
        error::Error,
        fs::File,
        io::{BufReader, BufWriter, Write},
    },
};

#[repr(u16)]
#[derive(BinaryEnum, Clone, Copy, Debug, Default, PartialEq)]
enum Format {
    #[default]
    Pcm = 1,
    Float = 3,
}

#[derive(BinaryObject, Debug, Default, PartialEq)]
#[binary(endianness = "little")]
struct WavHeader {
    #[binary(exact(data = "RIFF", encoding = "us-ascii"), member)]
    riff_len: u32,
    #[binary(exact(data = "WAVEfmt ", encoding = "us-ascii"), member)]
    fmt_len: u32,
    #[binary(member)]
    format: Format,
    #[binary(member)]
    channels: u16,
    #[binary(member)]
    sample_rate: u32,
    #[binary(member)]
    byte_rate: u32,
    #[binary(member)]
    block_align: u16,
    #[binary(member)]
    bits: u16,
    #[binary(exact(data = "data", encoding = "us-ascii"), member)]
    data_len: u32,
}

impl WavHeader {
    fn pcm16(sample_rate: u32, samples: usize) -> Self {
        let data_len = (samples * 2) as u32;
        Self {
            riff_len: 36 + data_len,
            fmt_len: 16,
            format: Format::Pcm,
            channels: 1,
            sample_rate,
            byte_rate: sample_rate * 2,
            block_align: 2,
            bits: 16,
            data_len,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let params = Params::default().with_endianness(Endianness::Little);
    let samples: Vec<i16> = (0..64)
        .map(|i| ((i as f32 / 8.0).sin() * i16::MAX as f32) as i16)
        .collect();
    let header = WavHeader::pcm16(8_000, samples.len());
    assert_eq!(binary_size(&header, &params)?, 44);

    let path = std::env::temp_dir().join("rawbytes-demo.wav");
    let mut sink = BufWriter::new(File::create(&path)?);
    convert_to_writer(&header, &mut sink, &params)?;
    for sample in &samples {
        convert_to_writer(sample, &mut sink, &params)?;
    }
    sink.flush()?;
    drop(sink);

    let mut reader = StreamReader::new(BufReader::new(File::open(&path)?));
    let decoded: WavHeader = schema::read(&mut reader, &params)?;
    assert_eq!(decoded, header);

    let mut read_back = Vec::with_capacity(decoded.data_len as usize / 2);
    for _ in 0..decoded.data_len / 2 {
        read_back.push(schema::read::<i16>(&mut reader, &params)?);
    }
    assert_eq!(read_back, samples);
    assert!(reader.read_to_end()?.is_empty());

    println!(
        "{}: {:?}, {} Hz, {} samples, {} bytes",
        path.display(),
        decoded.format,
        decoded.sample_rate,
        read_back.len(),
        reader.position()
    );
    std::fs::remove_file(&path)?;
    Ok(())
}
