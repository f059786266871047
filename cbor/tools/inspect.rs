/*!
Inspect command - display CBOR data as an item listing or hex dump
*/

use super::io::{Input, Output};
use anyhow::{Context, bail};
use clap::Parser;
use lean_cbor::decode::Decoder;
use lean_cbor::layout::{MajorType, SpecialType};
use std::fmt::Write;
use tracing::debug;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "listing",
        value_name = "FORMAT",
        help = "Output format: listing (one item per line, with offsets), hex"
    )]
    format: OutputFormat,

    /// Treat the input as hexadecimal text rather than binary
    #[arg(long = "hex-input")]
    hex_input: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// One line per item, indented by nesting depth
    Listing,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let cbor_bytes = if self.hex_input {
            let text = self.input.read_to_string()?;
            hex::decode(text.split_whitespace().collect::<String>())
                .context("Input is not valid hexadecimal")?
        } else {
            self.input.read_all()?
        };

        let output_text = match self.format {
            OutputFormat::Listing => format_listing(&cbor_bytes)?,
            OutputFormat::Hex => hex::encode(&cbor_bytes) + "\n",
        };

        let output = self.output.unwrap_or_default();
        output.write_all(output_text.as_bytes())
    }
}

/// Walk `data` item by item, one line per item.
///
/// Array and map headers open a nesting level that closes once the declared
/// number of items has been listed.
pub fn format_listing(data: &[u8]) -> anyhow::Result<String> {
    let mut decoder = Decoder::new(data);
    let mut pending: Vec<usize> = Vec::new();
    let mut out = String::new();

    while !decoder.is_at_end() {
        let offset = decoder.offset();
        let depth = pending.len();
        if let Some(remaining) = pending.last_mut() {
            *remaining -= 1;
        }

        let (major, _) = decoder.peek()?;
        let mut children = 0;
        let desc = match major {
            MajorType::UnsignedInteger => format!("unsigned {}", decoder.decode_u64()?),
            MajorType::NegativeInteger => format!(
                "negative {}",
                decoder
                    .decode_i64()
                    .with_context(|| format!("Negative integer at offset {offset}"))?
            ),
            MajorType::ByteString => format!("bytes h'{}'", hex::encode(decoder.decode_bytes()?)),
            MajorType::TextString => format!("text {:?}", decoder.decode_text()?),
            MajorType::Array => {
                let count = decoder.decode_array_len()?;
                children = count;
                format!("array({count})")
            }
            MajorType::Map => {
                let count = decoder.decode_map_len()?;
                children = count
                    .checked_mul(2)
                    .with_context(|| format!("Map size {count} at offset {offset} is too large"))?;
                format!("map({count})")
            }
            MajorType::Tag => bail!("Unsupported tag at offset {offset}"),
            MajorType::Special => match decoder.peek_special()? {
                Some(SpecialType::False | SpecialType::True) => {
                    format!("{}", decoder.decode_bool()?)
                }
                Some(SpecialType::SingleFloat) => format!("float {:?}", decoder.decode_f32()?),
                other => bail!("Unsupported special value {other:?} at offset {offset}"),
            },
        };

        debug!(offset, depth, "{desc}");
        writeln!(out, "{offset:>6}: {:indent$}{desc}", "", indent = depth * 2)?;

        if children > 0 {
            pending.push(children);
        }
        while pending.last() == Some(&0) {
            pending.pop();
        }
    }

    if !pending.is_empty() {
        bail!(
            "Input ends inside {} unfinished array(s) or map(s)",
            pending.len()
        );
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn lines(data: &[u8]) -> Vec<String> {
        format_listing(data)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn nested_arrays() {
        assert_eq!(
            lines(&hex::decode("8301820203820405").unwrap()),
            [
                "     0: array(3)",
                "     1:   unsigned 1",
                "     2:   array(2)",
                "     3:     unsigned 2",
                "     4:     unsigned 3",
                "     5:   array(2)",
                "     6:     unsigned 4",
                "     7:     unsigned 5",
            ]
        );
    }

    #[test]
    fn map_and_scalars() {
        assert_eq!(
            lines(&hex::decode("a26161f5616242beef").unwrap()),
            [
                "     0: map(2)",
                "     1:   text \"a\"",
                "     3:   true",
                "     4:   text \"b\"",
                "     6:   bytes h'beef'",
            ]
        );
        assert_eq!(
            lines(&hex::decode("8220fa3fc00000").unwrap()),
            ["     0: array(2)", "     1:   negative -1", "     2:   float 1.5"]
        );
    }

    #[test]
    fn sequence_of_items() {
        assert_eq!(
            lines(&hex::decode("80a0f4").unwrap()),
            ["     0: array(0)", "     1: map(0)", "     2: false"]
        );
    }

    #[test]
    fn unsupported() {
        assert!(format_listing(&hex::decode("c11a514b67b0").unwrap()).is_err());
        assert!(format_listing(&hex::decode("f93c00").unwrap()).is_err());
        assert!(format_listing(&hex::decode("f6").unwrap()).is_err());
        assert!(format_listing(&hex::decode("9f01ff").unwrap()).is_err());
    }

    #[test]
    fn truncated() {
        assert!(format_listing(&hex::decode("8201").unwrap()).is_err());
        assert!(format_listing(&hex::decode("1a0001").unwrap()).is_err());
    }
}
