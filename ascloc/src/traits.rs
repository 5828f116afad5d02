//! Traits for reading and writing JSON documents on disk.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;

use crate::error::Error;

/// Indentation used for every file ascloc writes.
const INDENT: &[u8] = b"    ";

/// A value that can be persisted as a pretty-printed JSON file.
///
/// Output is UTF-8 with non-ASCII characters written literally, indented with
/// four spaces. Writing always replaces the whole file.
///
/// # Example
///
/// ```rust,no_run
/// use ascloc::traits::JsonFile;
/// let snapshot = serde_json::Value::read_from("data/applications/apps.json")?;
/// snapshot.write_to("apps_copy.json")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait JsonFile: Serialize + DeserializeOwned {
    /// Parse from any reader.
    fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        write_pretty(writer, self)
    }

    /// Write to file path, truncating any previous content.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        write_json_file(path, self)
    }

    /// Serialize into a pretty-printed string.
    fn to_pretty_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Error::InvalidResource(format!("serialized JSON is not UTF-8: {}", e)))
    }
}

impl<T> JsonFile for T where T: Serialize + DeserializeOwned {}

/// Pretty-prints any serializable value with the crate's indentation.
pub fn write_pretty<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<(), Error> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(())
}

/// Writes any serializable value to `path`, replacing the file.
pub fn write_json_file<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_non_ascii_is_written_literally() {
        let value = json!({"data": [{"attributes": {"whatsNew": "Виправлено помилки ✨"}}]});
        let text = value.to_pretty_string().unwrap();
        assert!(text.contains("Виправлено помилки ✨"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_four_space_indent() {
        let text = json!({"data": []}).to_pretty_string().unwrap();
        assert_eq!(text, "{\n    \"data\": []\n}");
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        json!({"data": [{"id": "1"}]}).write_to(&path).unwrap();
        json!({"data": []}).write_to(&path).unwrap();
        let back = Value::read_from(&path).unwrap();
        assert_eq!(back, json!({"data": []}));
    }
}
