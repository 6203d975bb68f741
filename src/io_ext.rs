use std::io::{self, Write};

/// Line-oriented writing on top of any writer.
pub trait WriteLn: Write {
    /// Write `line` followed by a newline.
    fn write_ln(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }
}

impl<W: Write + ?Sized> WriteLn for W {}
