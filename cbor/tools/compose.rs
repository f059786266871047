/*!
Compose command - convert JSON to CBOR
*/

use crate::io::{Input, Output};
use anyhow::bail;
use clap::Parser;
use lean_cbor::encode::Encoder;
use tracing::debug;

/// Convert JSON to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse JSON and convert it to CBOR binary.\n\n\
                  Integers become CBOR integers, other numbers become single-precision floats.\n\
                  Arrays and objects become definite-length arrays and maps.\n\
                  JSON null has no representation and is rejected."
)]
pub struct Command {
    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input JSON file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let input_text = self.input.read_to_string()?;
        let json_value: serde_json::Value = serde_json::from_str(&input_text)?;

        let cbor_bytes = json_to_cbor(&json_value)?;
        debug!("Composed {} bytes of CBOR", cbor_bytes.len());

        self.output.unwrap_or_default().write_all(&cbor_bytes)
    }
}

pub fn json_to_cbor(value: &serde_json::Value) -> anyhow::Result<Vec<u8>> {
    let mut encoder = Encoder::new();
    emit_json(&mut encoder, value)?;
    Ok(encoder.build())
}

fn emit_json(encoder: &mut Encoder, value: &serde_json::Value) -> anyhow::Result<()> {
    use serde_json::Value as J;

    match value {
        J::Null => bail!("JSON null has no CBOR representation in this subset"),
        J::Bool(b) => encoder.emit(b),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                encoder.emit(&i)
            } else if let Some(u) = n.as_u64() {
                encoder.emit(&u)
            } else if let Some(f) = n.as_f64() {
                // Narrowed to single precision, which may lose accuracy
                encoder.emit(&(f as f32))
            } else {
                bail!("Invalid JSON number: {n}")
            }
        }
        J::String(s) => encoder.emit(s),
        J::Array(items) => {
            encoder.emit_array_header(items.len());
            for item in items {
                emit_json(encoder, item)?;
            }
        }
        J::Object(obj) => {
            encoder.emit_map_header(obj.len());
            for (key, val) in obj {
                encoder.emit(key);
                emit_json(encoder, val)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use lean_cbor::decode::Decoder;

    fn compose(json: &str) -> anyhow::Result<Vec<u8>> {
        json_to_cbor(&serde_json::from_str(json)?)
    }

    #[test]
    fn scalars() {
        assert_eq!(compose("64").unwrap(), hex::decode("1840").unwrap());
        assert_eq!(compose("-1000").unwrap(), hex::decode("3903e7").unwrap());
        assert_eq!(
            compose("18446744073709551615").unwrap(),
            hex::decode("1bffffffffffffffff").unwrap()
        );
        assert_eq!(compose("1.5").unwrap(), hex::decode("fa3fc00000").unwrap());
        assert_eq!(compose("true").unwrap(), hex::decode("f5").unwrap());
        assert_eq!(compose("\"a\"").unwrap(), hex::decode("6161").unwrap());
    }

    #[test]
    fn containers() {
        assert_eq!(
            compose("[1, [2, 3], [4, 5]]").unwrap(),
            hex::decode("8301820203820405").unwrap()
        );
        assert_eq!(
            compose(r#"{"a": 1, "b": [2, 3]}"#).unwrap(),
            hex::decode("a26161016162820203").unwrap()
        );
    }

    #[test]
    fn decodes_back() {
        let data = compose(r#"{"name": "Alice", "scores": [1.5, 2.5]}"#).unwrap();
        let mut d = Decoder::new(&data);
        assert_eq!(2, d.decode_map_len().unwrap());
        assert_eq!("name", d.decode_text().unwrap());
        assert_eq!("Alice", d.decode_text().unwrap());
        assert_eq!("scores", d.decode_text().unwrap());
        assert_eq!(vec![1.5f32, 2.5], d.decode_f32_array().unwrap());
        assert!(d.is_at_end());
    }

    #[test]
    fn null_rejected() {
        assert!(compose("null").is_err());
        assert!(compose("[1, null]").is_err());
    }
}
