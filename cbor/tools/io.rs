/*!
Reading input from a file or stdin, and writing output to a file or stdout
*/

use anyhow::Context;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// `-` selects stdin
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read stdin")?;
                Ok(buffer)
            }
            Input::File(path) => {
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    pub fn read_to_string(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_all()?).context("Input is not valid UTF-8")
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        })
    }
}

/// Empty or `-` selects stdout
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush().context("Failed to write stdout")
            }
            Output::File(path) => std::fs::write(path, data)
                .with_context(|| format!("Failed to write {}", path.display())),
        }
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Output::Stdout,
            path => Output::File(PathBuf::from(path)),
        })
    }
}
