// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Structured view of a CoreDNS Corefile.
//!
//! Only the top level is interpreted: a Corefile is a sequence of server
//! blocks (`keys { ... }`) with comments, blank lines and top-level
//! directives such as `import` in between. Block bodies and anything outside
//! blocks are kept verbatim so rendering an unmodified Corefile gives back
//! the original text.

use crate::constants::dns;
use crate::error::{BridgeError, Result};
use std::fmt;
use std::net::IpAddr;

/// A forwarding rule for one synthetic zone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneForward {
    pub zone: String,
    pub upstream: IpAddr,
    pub cache_ttl_secs: u32,
}

impl ZoneForward {
    pub fn new(zone: impl Into<String>, upstream: IpAddr) -> Self {
        Self {
            zone: zone.into(),
            upstream,
            cache_ttl_secs: dns::CACHE_TTL_SECS,
        }
    }

    /// Server block key, e.g. `cluster2.local:53`
    pub fn key(&self) -> String {
        format!("{}:{}", self.zone, dns::PORT)
    }

    pub fn to_block(&self) -> ServerBlock {
        ServerBlock {
            keys: vec![self.key()],
            body: vec![
                "    errors".to_string(),
                format!("    cache {}", self.cache_ttl_secs),
                format!("    forward . {}", self.upstream),
            ],
            trailer: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServerBlock {
    pub keys: Vec<String>,
    /// Raw body lines between the braces
    pub body: Vec<String>,
    /// Text after the closing brace, usually a comment
    pub trailer: String,
}

impl ServerBlock {
    /// True when this block serves exactly the given zone on the DNS port
    pub fn serves_only(&self, zone: &str) -> bool {
        let wanted = normalize_key(zone);
        self.keys.len() == 1 && normalize_key(&self.keys[0]) == wanted
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    /// Comment or blank line outside any block
    Trivia(String),
    /// Top-level directive line, e.g. `import common.conf`
    Directive(String),
    Block(ServerBlock),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corefile {
    items: Vec<Item>,
}

impl Corefile {
    pub fn parse(text: &str) -> Result<Self> {
        let mut items = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((lineno, line)) = lines.next() {
            let code = strip_comment(line).trim();
            if code.is_empty() {
                items.push(Item::Trivia(line.to_string()));
                continue;
            }

            let Some(open) = code.find('{') else {
                if code.contains('}') {
                    return Err(BridgeError::CorefileError(format!(
                        "line {}: unbalanced '}}' outside a server block",
                        lineno + 1
                    )));
                }
                items.push(Item::Directive(line.to_string()));
                continue;
            };

            let keys: Vec<String> = code[..open]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            if keys.is_empty() {
                return Err(BridgeError::CorefileError(format!(
                    "line {}: server block without keys",
                    lineno + 1
                )));
            }

            let rest = &code[open + 1..];
            let mut depth = 1 + brace_delta(rest);
            let mut body = Vec::new();
            let mut trailer = String::new();

            if depth <= 0 {
                // one-line block: `zone { directive }`
                let inner = rest.rsplit_once('}').map_or(rest, |(inner, _)| inner).trim();
                if !inner.is_empty() {
                    body.push(format!("    {}", inner));
                }
                trailer = after_closing_brace(line).to_string();
            } else {
                if !rest.trim().is_empty() {
                    body.push(format!("    {}", rest.trim()));
                }
                loop {
                    let Some((_, line)) = lines.next() else {
                        return Err(BridgeError::CorefileError(format!(
                            "unterminated server block '{}' starting at line {}",
                            keys.join(" "),
                            lineno + 1
                        )));
                    };
                    depth += brace_delta(strip_comment(line));
                    if depth <= 0 {
                        let before = strip_comment(line)
                            .rsplit_once('}')
                            .map_or("", |(before, _)| before);
                        if !before.trim().is_empty() {
                            body.push(before.to_string());
                        }
                        trailer = after_closing_brace(line).to_string();
                        break;
                    }
                    body.push(line.to_string());
                }
            }

            items.push(Item::Block(ServerBlock {
                keys,
                body,
                trailer,
            }));
        }

        Ok(Corefile { items })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ServerBlock> {
        self.items.iter().filter_map(|item| match item {
            Item::Block(block) => Some(block),
            Item::Trivia(_) | Item::Directive(_) => None,
        })
    }

    /// Number of blocks serving exactly the given zone
    pub fn count_zone(&self, zone: &str) -> usize {
        self.blocks().filter(|b| b.serves_only(zone)).count()
    }

    /// Add the block unconditionally, even if the zone is already served
    pub fn append(&mut self, block: ServerBlock) {
        self.items.push(Item::Block(block));
    }

    /// Replace the first block serving the same zone and drop any further
    /// duplicates, or append when the zone is not served yet.
    /// Returns true when an existing block was replaced.
    pub fn upsert(&mut self, block: ServerBlock) -> bool {
        let Some(zone) = block.keys.first().cloned() else {
            self.append(block);
            return false;
        };

        let mut replaced = false;
        let mut pending = Some(block);
        self.items.retain_mut(|item| match item {
            Item::Block(existing) if existing.serves_only(&zone) => match pending.take() {
                Some(new) => {
                    *existing = new;
                    replaced = true;
                    true
                }
                None => false,
            },
            _ => true,
        });

        if let Some(block) = pending {
            self.append(block);
        }
        replaced
    }
}

impl fmt::Display for Corefile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                Item::Trivia(line) | Item::Directive(line) => writeln!(f, "{}", line)?,
                Item::Block(block) => {
                    writeln!(f, "{} {{", block.keys.join(" "))?;
                    for line in &block.body {
                        writeln!(f, "{}", line)?;
                    }
                    writeln!(f, "}}{}", block.trailer)?;
                }
            }
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

/// Raw text following the last closing brace outside a comment
fn after_closing_brace(line: &str) -> &str {
    strip_comment(line)
        .rfind('}')
        .map_or("", |closing| &line[closing + 1..])
}

fn brace_delta(code: &str) -> i32 {
    code.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// `Zone.`, `zone` and `zone:53` all name the same server block key
fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_lowercase();
    let key = key.strip_prefix("dns://").unwrap_or(&key);
    let (zone, port) = match key.rsplit_once(':') {
        Some((zone, port)) => (zone, port),
        None => (key, "53"),
    };
    let zone = if zone.len() > 1 {
        zone.trim_end_matches('.')
    } else {
        zone
    };
    format!("{}:{}", zone, port)
}
