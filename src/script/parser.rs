//! Keystroke script parser.
//!
//! Syntax:
//! ```text
//! ; Comment
//! 7 enter 3 +         ; 10
//! 1.5E-3 sq           ; literals are typed key by key
//! sto A  rcl A  clv A ; variable slots A-F
//! const 1 3           ; catalog group 1, entry 3
//! angle rad  hyp on  disp eng  zero pad
//! ```

use crate::rpn::{AngleMode, DispMode, HyperbolicMode, Operation, ZeroMode};
use crate::rpn::vars::{slot_index, slot_name};
use crate::rpn::constants;
use std::fmt;
use thiserror::Error;

/// One key press (or mode switch) on the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Dot,
    Exponent,
    ChangeSign,
    Backspace,
    ClearX,
    Enter,
    Swap,
    RollUp,
    RollDown,
    Op(Operation),
    Pi,
    E,
    /// The LAST key: LastX or undo depending on the setting.
    Last,
    Undo,
    Store(usize),
    Recall(usize),
    ClearVar(usize),
    Constant { group: usize, index: usize },
    Hyperbolic(HyperbolicMode),
    Angle(AngleMode),
    Disp(DispMode),
    Zero(ZeroMode),
}

/// Parse a script into the keys it presses.
pub fn parse_script(source: &str) -> Result<Vec<Key>, ScriptError> {
    let mut keys = Vec::new();
    for (line_num, line) in source.lines().enumerate() {
        parse_line(line, line_num + 1, &mut keys)?;
    }
    Ok(keys)
}

fn parse_line(line: &str, line_num: usize, keys: &mut Vec<Key>) -> Result<(), ScriptError> {
    // Remove comments
    let line = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        if is_literal(token) {
            type_literal(token, line_num, keys)?;
            continue;
        }

        let word = token.to_lowercase();
        let key = match word.as_str() {
            "." => Key::Dot,
            "eex" => Key::Exponent,
            "chs" => Key::ChangeSign,
            "bksp" => Key::Backspace,
            "clx" => Key::ClearX,
            "enter" => Key::Enter,
            "swap" => Key::Swap,
            "rup" => Key::RollUp,
            "rdn" => Key::RollDown,
            "pi" => Key::Pi,
            "e" => Key::E,
            "last" => Key::Last,
            "undo" => Key::Undo,

            "sto" | "rcl" | "clv" => {
                let operand = operand(&mut tokens, &word, line_num)?;
                let slot = slot_of(operand)
                    .ok_or_else(|| invalid(line_num, &word, operand))?;
                match word.as_str() {
                    "sto" => Key::Store(slot),
                    "rcl" => Key::Recall(slot),
                    _ => Key::ClearVar(slot),
                }
            }

            "const" => {
                let group_text = operand(&mut tokens, &word, line_num)?;
                let index_text = operand(&mut tokens, &word, line_num)?;
                let group = group_text.parse::<usize>()
                    .map_err(|_| invalid(line_num, &word, group_text))?;
                let index = index_text.parse::<usize>()
                    .map_err(|_| invalid(line_num, &word, index_text))?;
                if constants::lookup(group, index).is_none() {
                    return Err(invalid(line_num, &word, &format!("{} {}", group, index)));
                }
                Key::Constant { group, index }
            }

            "hyp" => {
                let operand = operand(&mut tokens, &word, line_num)?;
                match operand.to_lowercase().as_str() {
                    "on" => Key::Hyperbolic(HyperbolicMode::On),
                    "off" => Key::Hyperbolic(HyperbolicMode::Off),
                    _ => return Err(invalid(line_num, &word, operand)),
                }
            }

            "angle" => {
                let operand = operand(&mut tokens, &word, line_num)?;
                match operand.to_lowercase().as_str() {
                    "deg" => Key::Angle(AngleMode::Deg),
                    "rad" => Key::Angle(AngleMode::Rad),
                    "grad" => Key::Angle(AngleMode::Grad),
                    _ => return Err(invalid(line_num, &word, operand)),
                }
            }

            "disp" => {
                let operand = operand(&mut tokens, &word, line_num)?;
                match operand.to_lowercase().as_str() {
                    "normal" | "norm" => Key::Disp(DispMode::Normal),
                    "sci" => Key::Disp(DispMode::Scientific),
                    "eng" => Key::Disp(DispMode::Engineering),
                    _ => return Err(invalid(line_num, &word, operand)),
                }
            }

            "zero" => {
                let operand = operand(&mut tokens, &word, line_num)?;
                match operand.to_lowercase().as_str() {
                    "pad" => Key::Zero(ZeroMode::Pad),
                    "trim" => Key::Zero(ZeroMode::Trim),
                    _ => return Err(invalid(line_num, &word, operand)),
                }
            }

            _ => match Operation::from_name(&word) {
                Some(op) => Key::Op(op),
                None => return Err(ScriptError::UnknownToken {
                    line: line_num,
                    token: token.to_string(),
                }),
            },
        };
        keys.push(key);
    }
    Ok(())
}

fn operand<'a, I>(tokens: &mut I, command: &str, line_num: usize) -> Result<&'a str, ScriptError>
where
    I: Iterator<Item = &'a str>,
{
    tokens.next().ok_or_else(|| ScriptError::MissingOperand {
        line: line_num,
        command: command.to_string(),
    })
}

fn invalid(line_num: usize, command: &str, operand: &str) -> ScriptError {
    ScriptError::InvalidOperand {
        line: line_num,
        command: command.to_string(),
        operand: operand.to_string(),
    }
}

fn slot_of(operand: &str) -> Option<usize> {
    let mut chars = operand.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => slot_index(c),
        _ => None,
    }
}

/// Does the token start like a number? A lone `-` or `+` is an operation.
fn is_literal(token: &str) -> bool {
    let body = token.strip_prefix(['-', '+']).unwrap_or(token);
    body.starts_with(|c: char| c.is_ascii_digit())
        || (body.starts_with('.') && body.len() > 1)
}

/// Expand `[sign]digits[.digits][E[sign]digits]` into key presses. The
/// mantissa sign is applied after its digits so it toggles the literal
/// rather than negating X.
fn type_literal(token: &str, line_num: usize, keys: &mut Vec<Key>) -> Result<(), ScriptError> {
    let bad = || ScriptError::InvalidLiteral { line: line_num, literal: token.to_string() };

    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let (mantissa, exponent) = match body.find(['E', 'e']) {
        Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
        None => (body, None),
    };

    let mut digits = 0;
    let mut seen_dot = false;
    for c in mantissa.chars() {
        match c {
            '0'..='9' => {
                digits += 1;
                keys.push(Key::Digit(c));
            }
            '.' if !seen_dot => {
                seen_dot = true;
                keys.push(Key::Dot);
            }
            _ => return Err(bad()),
        }
    }
    if digits == 0 {
        return Err(bad());
    }
    if negative {
        keys.push(Key::ChangeSign);
    }

    if let Some(exp) = exponent {
        keys.push(Key::Exponent);
        let (exp_negative, exp_digits) = match exp.as_bytes().first() {
            Some(b'-') => (true, &exp[1..]),
            Some(b'+') => (false, &exp[1..]),
            _ => (false, exp),
        };
        if exp_negative {
            keys.push(Key::ChangeSign);
        }
        if exp_digits.is_empty() || !exp_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }
        keys.extend(exp_digits.chars().map(Key::Digit));
    }
    Ok(())
}

/// Format keys back into script text, one token per key.
pub fn format_keys(keys: &[Key]) -> String {
    keys.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = |index: usize| slot_name(index).unwrap_or('?');
        match self {
            Key::Digit(c) => write!(f, "{}", c),
            Key::Dot => write!(f, "."),
            Key::Exponent => write!(f, "eex"),
            Key::ChangeSign => write!(f, "chs"),
            Key::Backspace => write!(f, "bksp"),
            Key::ClearX => write!(f, "clx"),
            Key::Enter => write!(f, "enter"),
            Key::Swap => write!(f, "swap"),
            Key::RollUp => write!(f, "rup"),
            Key::RollDown => write!(f, "rdn"),
            Key::Op(op) => write!(f, "{}", op),
            Key::Pi => write!(f, "pi"),
            Key::E => write!(f, "e"),
            Key::Last => write!(f, "last"),
            Key::Undo => write!(f, "undo"),
            Key::Store(i) => write!(f, "sto {}", slot(*i)),
            Key::Recall(i) => write!(f, "rcl {}", slot(*i)),
            Key::ClearVar(i) => write!(f, "clv {}", slot(*i)),
            Key::Constant { group, index } => write!(f, "const {} {}", group, index),
            Key::Hyperbolic(mode) => write!(f, "hyp {}", if mode.is_on() { "on" } else { "off" }),
            Key::Angle(mode) => write!(f, "angle {}", mode.label().to_lowercase()),
            Key::Disp(mode) => write!(f, "disp {}", match mode {
                DispMode::Normal => "normal",
                DispMode::Scientific => "sci",
                DispMode::Engineering => "eng",
            }),
            Key::Zero(mode) => write!(f, "zero {}", mode.label().to_lowercase()),
        }
    }
}

/// Errors that can occur while parsing a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown token on line {line}: {token}")]
    UnknownToken { line: usize, token: String },

    #[error("malformed number on line {line}: {literal}")]
    InvalidLiteral { line: usize, literal: String },

    #[error("{command} on line {line} needs an operand")]
    MissingOperand { line: usize, command: String },

    #[error("invalid operand for {command} on line {line}: {operand}")]
    InvalidOperand { line: usize, command: String, operand: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let source = r#"
            ; seven plus three
            7 enter 3 +
        "#;
        let keys = parse_script(source).unwrap();
        assert_eq!(
            keys,
            vec![Key::Digit('7'), Key::Enter, Key::Digit('3'), Key::Op(Operation::Add)]
        );
    }

    #[test]
    fn test_parse_literal() {
        let keys = parse_script("-1.5E-3").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Digit('1'),
                Key::Dot,
                Key::Digit('5'),
                Key::ChangeSign,
                Key::Exponent,
                Key::ChangeSign,
                Key::Digit('3'),
            ]
        );
        assert_eq!(parse_script(".5").unwrap(), vec![Key::Dot, Key::Digit('5')]);
    }

    #[test]
    fn test_lone_signs_are_operations() {
        assert_eq!(parse_script("- +").unwrap(), vec![Key::Op(Operation::Sub), Key::Op(Operation::Add)]);
    }

    #[test]
    fn test_parse_commands() {
        let keys = parse_script("sto b rcl F clv a const 2 9\nhyp ON angle grad disp eng zero pad").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Store(1),
                Key::Recall(5),
                Key::ClearVar(0),
                Key::Constant { group: 2, index: 9 },
                Key::Hyperbolic(HyperbolicMode::On),
                Key::Angle(AngleMode::Grad),
                Key::Disp(DispMode::Engineering),
                Key::Zero(ZeroMode::Pad),
            ]
        );
    }

    #[test]
    fn test_errors_carry_line() {
        assert_eq!(
            parse_script("1\n2 frob"),
            Err(ScriptError::UnknownToken { line: 2, token: "frob".into() })
        );
        assert_eq!(
            parse_script("\n\nsto"),
            Err(ScriptError::MissingOperand { line: 3, command: "sto".into() })
        );
        assert!(matches!(parse_script("sto G"), Err(ScriptError::InvalidOperand { line: 1, .. })));
        assert!(matches!(parse_script("const 3 0"), Err(ScriptError::InvalidOperand { .. })));
        assert!(matches!(parse_script("1.2.3"), Err(ScriptError::InvalidLiteral { .. })));
        assert!(matches!(parse_script("1E"), Err(ScriptError::InvalidLiteral { .. })));
    }

    #[test]
    fn test_format_reparses() {
        let source = "12.5 enter 2 pow sto C const 1 0 angle rad hyp off disp sci zero trim sin";
        let keys = parse_script(source).unwrap();
        let text = format_keys(&keys);
        assert_eq!(parse_script(&text).unwrap(), keys);
    }
}
