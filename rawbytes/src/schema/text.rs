//! Strings through the encoding registry.
use {
    super::{Binary, Handler, Strategy},
    crate::{
        encoding::{self, Encoding},
        error::{oversize, unknown_encoding, Result},
        io::{Reader, Writer},
        params::Params,
    },
    std::sync::Arc,
    tracing::trace,
};

fn codec(params: &Params) -> Result<Arc<dyn Encoding>> {
    encoding::lookup(params.encoding()).ok_or_else(|| unknown_encoding(params.encoding()))
}

/// Read a string according to `params`.
///
/// Null-terminated strings stop after the encoding's terminator; all others take
/// the rest of the input and are trimmed.
pub fn read_string(reader: &mut dyn Reader, params: &Params) -> Result<String> {
    let encoding = codec(params)?;
    if params.null_terminated() {
        let (raw, consumed) = reader.read_terminated(&encoding.null_terminator())?;
        trace!(encoding = encoding.name(), consumed, "read terminated string");
        return Ok(encoding.decode(&raw));
    }
    let raw = reader.read_to_end()?;
    Ok(params.trim(&encoding.decode(&raw)).to_owned())
}

/// Write `text` according to `params`.
///
/// Output larger than a bounded writer's capacity fails unless trimming is
/// enabled, in which case the encoded bytes are cut to fit. The cut may split a
/// multi-byte character.
pub fn write_string(text: &str, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    let encoding = codec(params)?;
    let mut bytes = encoding.encode(params.trim(text))?;
    if params.null_terminated() {
        bytes.extend_from_slice(&encoding.null_terminator());
    }
    if let Some(capacity) = writer.remaining() {
        if bytes.len() > capacity {
            if !params.trim_large_data() {
                return Err(oversize(bytes.len(), capacity));
            }
            trace!(needed = bytes.len(), capacity, "truncating string");
            bytes.truncate(capacity);
        }
    }
    writer.write(&bytes)?;
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn write_owned(text: &String, writer: &mut dyn Writer, params: &Params) -> Result<()> {
    write_string(text, writer, params)
}

impl Handler<String> {
    /// String strategy.
    pub fn text() -> Self {
        Handler::new(Strategy::Text, read_string, write_owned)
    }
}

impl Binary for String {
    fn text() -> Option<Handler<Self>> {
        Some(Handler::text())
    }
}
