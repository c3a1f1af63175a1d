use crate::core::{Member, Selector};
use crate::utils::error::{PruneError, Result};
use std::io::{BufRead, Write};

const PROMPT: &str =
    "\nSelect members to remove (e.g., 1,3,5 or 'all' to remove all, 'none' to cancel): ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Nothing,
    /// 0-based, deduplicated, in the order typed.
    Indices(Vec<usize>),
}

/// Parses one line of operator input against `count` listed candidates.
///
/// Indices are 1-based; out-of-range ones are dropped. Input with no usable
/// index, or with a token that is not an integer, is a `SelectionInputError`.
pub fn parse_selection(input: &str, count: usize) -> Result<Selection> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "all" => return Ok(Selection::All),
        "none" => return Ok(Selection::Nothing),
        _ => {}
    }

    let mut indices = Vec::new();
    for token in input.split(',') {
        let number: i64 = token.trim().parse().map_err(|_| PruneError::SelectionInputError {
            message: "Invalid input. Please enter valid indices separated by commas, 'all', or 'none'."
                .to_string(),
        })?;

        if number >= 1 && (number as u64) <= count as u64 {
            let index = (number - 1) as usize;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }

    if indices.is_empty() {
        return Err(PruneError::SelectionInputError {
            message: "No valid members selected. Please try again.".to_string(),
        });
    }

    Ok(Selection::Indices(indices))
}

pub fn format_candidate(position: usize, member: &Member) -> String {
    format!(
        "{}. Name: {} | ID: {} | Location: {}",
        position,
        member.name.as_deref().unwrap_or("Unknown"),
        member.id,
        member.location.as_deref().unwrap_or("Unknown")
    )
}

/// 互動式選擇：列出候選成員並讀取輸入，格式錯誤時重新詢問
pub struct TerminalSelector<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl TerminalSelector<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Selector for TerminalSelector<R, W> {
    fn select(&mut self, candidates: &[Member]) -> Result<Vec<Member>> {
        if candidates.is_empty() {
            writeln!(self.output, "No members found matching the specified location.")?;
            return Ok(Vec::new());
        }

        writeln!(self.output, "\nFiltered Members:")?;
        for (i, member) in candidates.iter().enumerate() {
            writeln!(self.output, "{}", format_candidate(i + 1, member))?;
        }

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output, "\nNo input received, nothing will be removed.")?;
                return Ok(Vec::new());
            }

            match parse_selection(&line, candidates.len()) {
                Ok(Selection::All) => return Ok(candidates.to_vec()),
                Ok(Selection::Nothing) => return Ok(Vec::new()),
                Ok(Selection::Indices(indices)) => {
                    return Ok(indices.into_iter().map(|i| candidates[i].clone()).collect())
                }
                Err(PruneError::SelectionInputError { message }) => {
                    tracing::debug!(input = %line.trim(), "Rejected selection input");
                    writeln!(self.output, "{}", message)?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
