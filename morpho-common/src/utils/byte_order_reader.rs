/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::prelude::*;
use std::io::{Result, SeekFrom};

/// A cursor-style reader that tracks its own position and can switch byte
/// order mid-stream. The ESRI Shapefile format mixes big- and little-endian
/// fields within a single file, which is the reason for the switchable order.
pub struct ByteOrderReader<R: Read + Seek> {
    is_le: bool,
    reader: R,
    pos: usize,
    len: usize,
}

impl<R: Read + Seek> ByteOrderReader<R> {
    pub fn new(reader: R, byte_order: Endianness) -> ByteOrderReader<R> {
        let mut bor = ByteOrderReader {
            reader: reader,
            is_le: byte_order == Endianness::LittleEndian,
            pos: 0usize,
            len: 0, // don't know the length yet
        };
        let len = bor.reader.seek(SeekFrom::End(0)).unwrap() as usize;
        bor.len = len;
        bor.seek(0); // return the cursor to the start.
        bor
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.is_le = byte_order == Endianness::LittleEndian;
    }

    pub fn seek(&mut self, position: usize) {
        self.pos = position;
        self.reader.seek(SeekFrom::Start(self.pos as u64)).unwrap();
    }

    pub fn inc_pos(&mut self, skip: usize) {
        self.pos += skip;
        self.reader.seek(SeekFrom::Start(self.pos as u64)).unwrap();
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_utf8(&mut self, length: usize) -> String {
        let mut bytes = vec![0u8; length];
        self.reader.read_exact(&mut bytes).unwrap();
        self.pos += length;
        String::from_utf8_lossy(&bytes).to_string()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.pos += 1;
        self.reader.read_u8()
    }

    pub fn peek_u8(&mut self) -> Result<u8> {
        let val = self.reader.read_u8();
        self.seek(self.pos);
        val
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.pos += 2;
        if self.is_le {
            return self.reader.read_u16::<LittleEndian>();
        }
        self.reader.read_u16::<BigEndian>()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_u32::<LittleEndian>();
        }
        self.reader.read_u32::<BigEndian>()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_i32::<LittleEndian>();
        }
        self.reader.read_i32::<BigEndian>()
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_f32::<LittleEndian>();
        }
        self.reader.read_f32::<BigEndian>()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.pos += 8;
        if self.is_le {
            return self.reader.read_f64::<LittleEndian>();
        }
        self.reader.read_f64::<BigEndian>()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Endianness {
    #[default]
    LittleEndian,
    BigEndian,
}

impl Endianness {
    pub fn from_str(val: &str) -> Endianness {
        let val_lc: &str = &val.to_lowercase();
        if val_lc.contains("lsb")
            || val_lc.contains("little")
            || val_lc.contains("intel")
            || val_lc.contains("least")
        {
            return Endianness::LittleEndian;
        }
        Endianness::BigEndian
    }
}

#[cfg(test)]
mod test {
    use super::{ByteOrderReader, Endianness};
    use std::io::Cursor;

    #[test]
    fn test_switchable_byte_order() {
        // 0x00000001 big-endian, then 0x01000000 little-endian; both read as 1.
        let data = vec![0u8, 0, 0, 1, 1, 0, 0, 0];
        let mut bor = ByteOrderReader::new(Cursor::new(data), Endianness::BigEndian);
        assert_eq!(bor.read_i32().unwrap(), 1);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 1);
        assert_eq!(bor.pos(), 8);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = vec![42u8, 7u8];
        let mut bor = ByteOrderReader::new(Cursor::new(data), Endianness::LittleEndian);
        assert_eq!(bor.peek_u8().unwrap(), 42);
        assert_eq!(bor.read_u8().unwrap(), 42);
        assert_eq!(bor.read_u8().unwrap(), 7);
    }
}
