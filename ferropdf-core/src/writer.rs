//! Byte-level serialization: header, object bodies, classic cross-reference
//! section and trailer.

use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::xref::XrefTable;
use std::collections::HashMap;
use std::io::Write;

/// Policy knobs threaded through value serialization.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Fractional digits for real numbers before trailing-zero trimming.
    pub real_precision: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { real_precision: 6 }
    }
}

/// Writes a prepared object table to a byte stream, tracking the byte
/// position of every emitted object for the cross-reference section.
///
/// The table is expected to be compacted and renumbered (dense ids from 1);
/// gaps are still emitted as free entries for robustness.
pub struct DocumentWriter<W: Write> {
    writer: W,
    offsets: HashMap<ObjectId, u64>,
    position: u64,
    options: SerializeOptions,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, SerializeOptions::default())
    }

    pub fn with_options(writer: W, options: SerializeOptions) -> Self {
        Self {
            writer,
            offsets: HashMap::new(),
            position: 0,
            options,
        }
    }

    /// Byte positions recorded for emitted objects, by id.
    pub fn offsets(&self) -> &HashMap<ObjectId, u64> {
        &self.offsets
    }

    pub fn write_document(
        &mut self,
        version: &str,
        xref: &XrefTable,
        trailer: &Dictionary,
    ) -> Result<()> {
        self.write_header(version)?;

        for (id, object) in xref.iter() {
            self.write_object(id, object)?;
        }

        let xref_position = self.position;
        let size = self.write_xref(xref)?;
        self.write_trailer(trailer, size, xref_position)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self, version: &str) -> Result<()> {
        self.write_bytes(b"%PDF-")?;
        self.write_bytes(version.as_bytes())?;
        self.write_bytes(b"\n")?;
        // Binary comment so transports treat the file as binary.
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.offsets.insert(id, self.position);
        let head = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(head.as_bytes())?;

        let mut body = Vec::new();
        object.write_value(&mut body, &self.options)?;
        self.write_bytes(&body)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    /// Emit the classic xref section. Returns the `/Size` value (highest
    /// object number plus one).
    fn write_xref(&mut self, xref: &XrefTable) -> Result<u64> {
        self.write_bytes(b"xref\n")?;

        let max_number = xref.ids().map(|id| id.number()).max().unwrap_or(0);
        let header = format!("0 {}\n", max_number + 1);
        self.write_bytes(header.as_bytes())?;

        // The head of the free list.
        self.write_bytes(b"0000000000 65535 f \n")?;

        for number in 1..=max_number {
            let id = ObjectId::new(number, 0);
            match self.offsets.get(&id) {
                Some(position) => {
                    let entry = format!("{:010} {:05} n \n", position, id.generation());
                    self.write_bytes(entry.as_bytes())?;
                }
                None => {
                    self.write_bytes(b"0000000000 00000 f \n")?;
                }
            }
        }
        Ok(max_number as u64 + 1)
    }

    fn write_trailer(&mut self, trailer: &Dictionary, size: u64, xref_position: u64) -> Result<()> {
        let mut trailer = trailer.clone();
        trailer.set("Size", size as i64);

        self.write_bytes(b"trailer\n")?;
        let mut body = Vec::new();
        trailer.write_value(&mut body, &self.options)?;
        self.write_bytes(&body)?;

        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }
}
