//! Utilities for working with CSV files.

use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

pub struct CsvWriter<W: Write> {
    writer: W,
}
impl CsvWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}
impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one record, quoting any datum that contains a comma or a quote.
    pub fn append<R>(&mut self, record: R) -> Result<(), io::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut first = true;
        for datum in record.into_iter() {
            if first {
                first = false;
            } else {
                self.writer.write_all(b",")?;
            }
            let datum: &str = datum.as_ref();
            if datum.contains([',', '"']) {
                write!(self.writer, "\"{}\"", datum.replace('"', "\"\""))?;
            } else {
                self.writer.write_all(datum.as_bytes())?;
            }
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), io::Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub struct CsvReader<R: BufRead> {
    lines: Lines<R>,
}
impl CsvReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}
impl<R: BufRead> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Reads the next record. A record continues onto the following line while a quoted field is
    /// left open.
    pub fn read(&mut self) -> Option<Result<Vec<String>, io::Error>> {
        let mut record = match self.lines.next()? {
            Ok(line) => line,
            Err(err) => return Some(Err(err)),
        };
        while record.matches('"').count() % 2 == 1 {
            match self.lines.next() {
                Some(Ok(line)) => {
                    record.push('\n');
                    record.push_str(&line);
                }
                Some(Err(err)) => return Some(Err(err)),
                None => break,
            }
        }
        Some(Ok(split_record(&record)))
    }
}

impl<R: BufRead> Iterator for CsvReader<R> {
    type Item = Result<Vec<String>, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

/// Splits a record into trimmed fields. A field may be enclosed in double quotes, in which case it
/// may contain commas and line breaks, and a doubled quote stands for a literal one.
pub fn split_record(line: &str) -> Vec<String> {
    let line = line.trim_end_matches('\r');
    let mut fields = vec![];
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            ',' if !quoted => {
                fields.push(field.trim().to_owned());
                field.clear();
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_owned());
    fields
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn split_plain() {
        assert_eq!(vec!["1004", "Toronto", "3", "-150"], split_record("1004,Toronto,3,-150"));
        assert_eq!(vec!["a", "", "c"], split_record("a,,c"));
        assert_eq!(vec![""], split_record(""));
    }

    #[test]
    fn split_trims_and_strips_carriage_return() {
        assert_eq!(vec!["Date", "Home", "RTOTSO"], split_record(" Date , Home,RTOTSO\r"));
    }

    #[test]
    fn split_quoted() {
        assert_eq!(
            vec!["Oct 4, 2018", "St. Louis Blues", ""],
            split_record(r#""Oct 4, 2018","St. Louis Blues","#)
        );
        assert_eq!(vec![r#"the "Habs""#, "MTL"], split_record(r#""the ""Habs""",MTL"#));
    }

    #[test]
    fn read_lines() {
        let mut reader = CsvReader::new(Cursor::new("Date,Team\n1004,Boston\n\n1005,Dallas\n"));
        assert_eq!(vec!["Date", "Team"], reader.read().unwrap().unwrap());
        let rest: Vec<_> = reader.map(Result::unwrap).collect();
        assert_eq!(
            vec![vec!["1004", "Boston"], vec![""], vec!["1005", "Dallas"]],
            rest
        );
    }

    #[test]
    fn read_quoted_line_break() {
        let mut reader = CsvReader::new(Cursor::new(
            "Team,Notes\r\nBoston,\"postponed,\r\nreplayed \"\"later\"\"\"\r\nDallas,\"\"\r\n",
        ));
        assert_eq!(vec!["Team", "Notes"], reader.read().unwrap().unwrap());
        assert_eq!(
            vec!["Boston", "postponed,\nreplayed \"later\""],
            reader.read().unwrap().unwrap()
        );
        assert_eq!(vec!["Dallas", ""], reader.read().unwrap().unwrap());
        assert!(reader.read().is_none());
    }

    #[test]
    fn read_unterminated_quote() {
        let mut reader = CsvReader::new(Cursor::new("Team\n\"Boston\nDallas\n"));
        assert_eq!(vec!["Team"], reader.read().unwrap().unwrap());
        assert_eq!(vec!["Boston\nDallas"], reader.read().unwrap().unwrap());
        assert!(reader.read().is_none());
    }

    #[test]
    fn write_then_read() {
        let mut writer = CsvWriter::new(vec![]);
        writer.append(["Season", "Overall"]).unwrap();
        writer.append(["2018-19", "58.25"]).unwrap();
        writer.append(["a,b", "say \"hi\""]).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(
            "Season,Overall\n2018-19,58.25\n\"a,b\",\"say \"\"hi\"\"\"\n",
            String::from_utf8(bytes.clone()).unwrap()
        );

        let records: Vec<_> = CsvReader::new(Cursor::new(bytes)).map(Result::unwrap).collect();
        assert_eq!(vec!["a,b", "say \"hi\""], records[2]);
    }
}
