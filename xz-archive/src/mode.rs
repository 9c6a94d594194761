//! Open-mode string parsing (spec §4.7), grounded on `xz.utils.parse_mode`.

use crate::error::{Error, Result};

/// The readable/writable/truncate/must-not-exist combination implied by an
/// open-mode string such as `"r+"` or `"xb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub readable: bool,
    pub writable: bool,
    pub truncate: bool,
    pub must_not_exist: bool,
}

/// Parse a mode string from the §4.7 table (`r`, `rb`, `r+`, `rb+`, `w`,
/// `wb`, `w+`, `wb+`, `x`, `xb`, `x+`, `xb+`).
///
/// Fails [`Error::InvalidMode`] on an unrecognized base character, a
/// duplicated flag, or a stray character outside `{r,w,x,b,+}`.
pub fn parse(mode: &str) -> Result<OpenMode> {
    let mut base = None;
    let mut plus = false;
    let mut binary = false;

    for ch in mode.chars() {
        match ch {
            'r' | 'w' | 'x' => {
                if base.replace(ch).is_some() {
                    return Err(Error::InvalidMode(mode.to_string()));
                }
            }
            '+' => {
                if plus {
                    return Err(Error::InvalidMode(mode.to_string()));
                }
                plus = true;
            }
            'b' => {
                if binary {
                    return Err(Error::InvalidMode(mode.to_string()));
                }
                binary = true;
            }
            _ => return Err(Error::InvalidMode(mode.to_string())),
        }
    }

    let base = base.ok_or_else(|| Error::InvalidMode(mode.to_string()))?;
    let _ = binary; // accepted but doesn't change semantics beyond validation

    Ok(match base {
        'r' => OpenMode {
            readable: true,
            writable: plus,
            truncate: false,
            must_not_exist: false,
        },
        'w' => OpenMode {
            readable: plus,
            writable: true,
            truncate: true,
            must_not_exist: false,
        },
        'x' => OpenMode {
            readable: plus,
            writable: true,
            truncate: true,
            must_not_exist: true,
        },
        _ => unreachable!("base is restricted to r/w/x above"),
    })
}

#[cfg(test)]
mod tests;
