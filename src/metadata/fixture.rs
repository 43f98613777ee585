//! Hand-built TIFF, JPEG, PNG and HEIF byte fixtures for tests

/// One directory entry to emit
#[derive(Debug, Clone)]
pub struct Field {
    tag: u16,
    type_id: u16,
    count: u32,
    data: FieldData,
}

#[derive(Debug, Clone)]
enum FieldData {
    Ascii(String),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
    Bytes(Vec<u8>),
    /// Value field written verbatim as an offset, whatever it points at
    Offset(u32),
}

impl Field {
    pub fn ascii(tag: u16, text: &str) -> Self {
        Self {
            tag,
            type_id: 2,
            count: text.len() as u32 + 1,
            data: FieldData::Ascii(text.to_string()),
        }
    }

    pub fn short(tag: u16, value: u16) -> Self {
        Self { tag, type_id: 3, count: 1, data: FieldData::Short(value) }
    }

    pub fn long(tag: u16, value: u32) -> Self {
        Self { tag, type_id: 4, count: 1, data: FieldData::Long(value) }
    }

    pub fn rational(tag: u16, num: u32, den: u32) -> Self {
        Self { tag, type_id: 5, count: 1, data: FieldData::Rational(num, den) }
    }

    pub fn undefined(tag: u16, bytes: &[u8]) -> Self {
        Self {
            tag,
            type_id: 7,
            count: bytes.len() as u32,
            data: FieldData::Bytes(bytes.to_vec()),
        }
    }

    /// An entry with an arbitrary type id carrying `bytes`
    pub fn typed(tag: u16, type_id: u16, count: u32, bytes: &[u8]) -> Self {
        Self { tag, type_id, count, data: FieldData::Bytes(bytes.to_vec()) }
    }

    /// An entry whose out-of-line value lives at `offset`
    pub fn dangling(tag: u16, type_id: u16, count: u32, offset: u32) -> Self {
        Self { tag, type_id, count, data: FieldData::Offset(offset) }
    }

    fn encode(&self, big: bool) -> Vec<u8> {
        match &self.data {
            FieldData::Ascii(s) => {
                let mut b = s.as_bytes().to_vec();
                b.push(0);
                b
            }
            FieldData::Short(v) => u16_bytes(*v, big).to_vec(),
            FieldData::Long(v) | FieldData::Offset(v) => u32_bytes(*v, big).to_vec(),
            FieldData::Rational(n, d) => {
                let mut b = u32_bytes(*n, big).to_vec();
                b.extend_from_slice(&u32_bytes(*d, big));
                b
            }
            FieldData::Bytes(b) => b.clone(),
        }
    }
}

fn u16_bytes(v: u16, big: bool) -> [u8; 2] {
    if big { v.to_be_bytes() } else { v.to_le_bytes() }
}

fn u32_bytes(v: u32, big: bool) -> [u8; 4] {
    if big { v.to_be_bytes() } else { v.to_le_bytes() }
}

/// Builds a TIFF block with IFD0, optional Exif/GPS/Interop sub-directories
/// and an optional IFD1
#[derive(Debug, Clone, Default)]
pub struct TiffBuilder {
    big: bool,
    ifd0: Vec<Field>,
    exif: Vec<Field>,
    interop: Vec<Field>,
    gps: Vec<Field>,
    ifd1: Vec<Field>,
}

struct Written {
    next_link: usize,
    slots: Vec<(u16, usize)>,
}

impl TiffBuilder {
    pub fn little_endian() -> Self {
        Self::default()
    }

    pub fn big_endian() -> Self {
        Self { big: true, ..Self::default() }
    }

    pub fn ifd0(mut self, field: Field) -> Self {
        self.ifd0.push(field);
        self
    }

    pub fn exif(mut self, field: Field) -> Self {
        self.exif.push(field);
        self
    }

    pub fn interop(mut self, field: Field) -> Self {
        self.interop.push(field);
        self
    }

    pub fn gps(mut self, field: Field) -> Self {
        self.gps.push(field);
        self
    }

    pub fn ifd1(mut self, field: Field) -> Self {
        self.ifd1.push(field);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = if self.big { b"MM\0*".to_vec() } else { b"II*\0".to_vec() };
        out.extend_from_slice(&u32_bytes(8, self.big));

        let mut ifd0 = self.ifd0.clone();
        if !self.exif.is_empty() || !self.interop.is_empty() {
            ifd0.push(Field::long(0x8769, 0));
        }
        if !self.gps.is_empty() {
            ifd0.push(Field::long(0x8825, 0));
        }
        let root = self.write_ifd(&mut out, &ifd0);

        if !self.exif.is_empty() || !self.interop.is_empty() {
            let mut exif = self.exif.clone();
            if !self.interop.is_empty() {
                exif.push(Field::long(0xa005, 0));
            }
            let at = out.len();
            self.patch(&mut out, slot(&root, 0x8769), at);
            let written = self.write_ifd(&mut out, &exif);
            if !self.interop.is_empty() {
                let at = out.len();
                self.patch(&mut out, slot(&written, 0xa005), at);
                self.write_ifd(&mut out, &self.interop);
            }
        }

        if !self.gps.is_empty() {
            let at = out.len();
            self.patch(&mut out, slot(&root, 0x8825), at);
            self.write_ifd(&mut out, &self.gps);
        }

        if !self.ifd1.is_empty() {
            let at = out.len();
            self.patch(&mut out, root.next_link, at);
            self.write_ifd(&mut out, &self.ifd1);
        }

        out
    }

    fn write_ifd(&self, out: &mut Vec<u8>, fields: &[Field]) -> Written {
        out.extend_from_slice(&u16_bytes(fields.len() as u16, self.big));
        let table = out.len();
        out.resize(table + fields.len() * 12 + 4, 0);

        let mut slots = Vec::new();
        for (i, field) in fields.iter().enumerate() {
            let at = table + i * 12;
            out[at..at + 2].copy_from_slice(&u16_bytes(field.tag, self.big));
            out[at + 2..at + 4].copy_from_slice(&u16_bytes(field.type_id, self.big));
            out[at + 4..at + 8].copy_from_slice(&u32_bytes(field.count, self.big));

            let data = field.encode(self.big);
            if matches!(field.data, FieldData::Offset(_)) || data.len() <= 4 {
                out[at + 8..at + 8 + data.len()].copy_from_slice(&data);
            } else {
                let offset = out.len();
                out.extend_from_slice(&data);
                if out.len() % 2 == 1 {
                    out.push(0);
                }
                self.patch(out, at + 8, offset);
            }
            slots.push((field.tag, at + 8));
        }

        Written { next_link: table + fields.len() * 12, slots }
    }

    fn patch(&self, out: &mut [u8], at: usize, value: usize) {
        out[at..at + 4].copy_from_slice(&u32_bytes(value as u32, self.big));
    }
}

fn slot(written: &Written, tag: u16) -> usize {
    written
        .slots
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, at)| *at)
        .expect("pointer slot written")
}

/// Wrap a TIFF block in a minimal JPEG with an APP1 Exif segment
pub fn jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xff, 0xd8, 0xff, 0xe1];
    out.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&[0xff, 0xd9]);
    out
}

/// Wrap a TIFF block in a minimal PNG with an `eXIf` chunk after `IHDR`
pub fn png(tiff: &[u8]) -> Vec<u8> {
    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    png_chunk(&mut out, b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0]);
    png_chunk(&mut out, b"eXIf", tiff);
    png_chunk(&mut out, b"IEND", &[]);
    out
}

fn png_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    // CRC is never checked by the header search
    out.extend_from_slice(&[0; 4]);
}

/// Wrap a TIFF block the way HEIF stores its `Exif` item: an `ftyp` box,
/// then item data holding a 4-byte header offset and the `Exif\0\0` prefix
pub fn heif(tiff: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let ftyp = b"ftypheic\0\0\0\0mif1heic";
    out.extend_from_slice(&((ftyp.len() + 4) as u32).to_be_bytes());
    out.extend_from_slice(ftyp);

    let item_len = 4 + 6 + tiff.len();
    out.extend_from_slice(&((item_len + 8) as u32).to_be_bytes());
    out.extend_from_slice(b"mdat");
    out.extend_from_slice(&6u32.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out
}
