//! `/ToUnicode` CMap parsing.
//!
//! Only the `bfchar` and `bfrange` sections matter for recovering text;
//! everything else in the CMap program is skipped. Sections are tokenized
//! as a whole, so entries split across lines still parse.

use std::collections::HashMap;

use crate::error::BackendError;

/// Character code to Unicode mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicode {
    mappings: HashMap<u32, String>,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    Open,
    Close,
}

impl ToUnicode {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut mappings = HashMap::new();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            let hex: Vec<&str> = tokens(section)
                .into_iter()
                .filter_map(|t| match t {
                    Token::Hex(h) => Some(h),
                    _ => None,
                })
                .collect();
            for pair in hex.chunks_exact(2) {
                mappings.insert(parse_code(pair[0])?, decode_utf16be(pair[1])?);
            }
        }

        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_ranges(&tokens(section), &mut mappings)?;
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(begin) {
        let body = &rest[start + begin.len()..];
        match body.find(end) {
            Some(stop) => {
                out.push(&body[..stop]);
                rest = &body[stop + end.len()..];
            }
            None => break,
        }
    }
    out
}

fn tokens(section: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut rest = section;
    while let Some(pos) = rest.find(['<', '[', ']']) {
        match rest.as_bytes()[pos] {
            b'[' => {
                out.push(Token::Open);
                rest = &rest[pos + 1..];
            }
            b']' => {
                out.push(Token::Close);
                rest = &rest[pos + 1..];
            }
            _ => {
                let body = &rest[pos + 1..];
                let Some(end) = body.find('>') else { break };
                out.push(Token::Hex(body[..end].trim()));
                rest = &body[end + 1..];
            }
        }
    }
    out
}

fn parse_ranges(tokens: &[Token<'_>], mappings: &mut HashMap<u32, String>) -> Result<(), BackendError> {
    let mut i = 0;
    while i + 2 < tokens.len() {
        let (Token::Hex(lo), Token::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
            i += 1;
            continue;
        };
        let (lo, hi) = (parse_code(lo)?, parse_code(hi)?);
        if hi < lo || hi - lo > 0xFFFF {
            return Err(BackendError::Parse(format!(
                "bad bfrange {lo:#x}..{hi:#x}"
            )));
        }
        match &tokens[i + 2] {
            Token::Hex(dst) => {
                let start = decode_utf16be(dst)?;
                let mut units: Vec<u16> = start.encode_utf16().collect();
                for code in lo..=hi {
                    mappings.insert(code, String::from_utf16_lossy(&units));
                    if let Some(last) = units.last_mut() {
                        *last = last.wrapping_add(1);
                    }
                }
                i += 3;
            }
            Token::Open => {
                let mut j = i + 3;
                let mut code = lo;
                while j < tokens.len() && tokens[j] != Token::Close {
                    if let Token::Hex(dst) = &tokens[j] {
                        if code <= hi {
                            mappings.insert(code, decode_utf16be(dst)?);
                        }
                        code += 1;
                    }
                    j += 1;
                }
                i = j + 1;
            }
            Token::Close => i += 3,
        }
    }
    Ok(())
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16).map_err(|e| BackendError::Parse(format!("invalid hex code '{hex}': {e}")))
}

/// Decode hex digits as UTF-16BE. Two-digit values are treated as one unit.
fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let padded = if hex.len() % 4 == 0 {
        hex
    } else {
        format!("{hex:0>width$}", width = hex.len().div_ceil(4) * 4)
    };
    let units = padded
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let s = std::str::from_utf8(chunk).unwrap_or("FFFD");
            u16::from_str_radix(s, 16)
                .map_err(|e| BackendError::Parse(format!("invalid UTF-16BE unit '{s}': {e}")))
        })
        .collect::<Result<Vec<u16>, _>>()?;
    Ok(String::from_utf16_lossy(&units))
}
