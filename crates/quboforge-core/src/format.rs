//! QUBO text format.
//!
//! ```text
//! c comment
//! p qubo 0 <max_nodes> <n_nodes> <n_couplers>
//! <i> <i> <bias>      linear term, n_nodes of these
//! <i> <j> <bias>      coupler with i < j, n_couplers of these
//! ```
//!
//! Comment lines start with `c` or `C`. The topology field is `0` or
//! `unconstrained`. Repeated `(i, j)` entries are summed.

use std::fmt::Write as _;

use crate::error::{QuboError, Result};
use crate::qubo::Qubo;

struct Header {
    max_nodes: usize,
    n_nodes: usize,
    n_couplers: usize,
}

fn malformed(line: usize, message: impl std::fmt::Display) -> QuboError {
    QuboError::MalformedProblem(format!("line {line}: {message}"))
}

fn parse_header(line_no: usize, line: &str) -> Result<Header> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(malformed(
            line_no,
            "problem line must be `p qubo <topology> <max_nodes> <n_nodes> <n_couplers>`",
        ));
    }
    if fields[1] != "qubo" {
        return Err(malformed(
            line_no,
            format!("problem line lists `{}`, not `qubo`", fields[1]),
        ));
    }
    if fields[2] != "0" && fields[2] != "unconstrained" {
        return Err(malformed(
            line_no,
            format!("unsupported topology `{}`", fields[2]),
        ));
    }
    let count = |s: &str, what: &str| {
        s.parse::<usize>()
            .map_err(|_| malformed(line_no, format!("bad {what} `{s}`")))
    };
    Ok(Header {
        max_nodes: count(fields[3], "max_nodes")?,
        n_nodes: count(fields[4], "n_nodes")?,
        n_couplers: count(fields[5], "n_couplers")?,
    })
}

/// Parses a QUBO in text format.
///
/// # Example
///
/// ```
/// use quboforge_core::format::parse_qubo;
///
/// let qubo = parse_qubo("c two nodes\np qubo 0 2 2 1\n0 0 -1\n1 1 -1\n0 1 2\n").unwrap();
/// assert_eq!(qubo.energy(&[true, false]), -1.0);
/// ```
pub fn parse_qubo(text: &str) -> Result<Qubo> {
    let mut header: Option<Header> = None;
    let mut terms = Vec::new();
    let mut nodes = 0usize;
    let mut couplers = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('c') || line.starts_with('C') {
            continue;
        }
        if line.starts_with('p') || line.starts_with('P') {
            if header.is_some() {
                return Err(malformed(line_no, "second problem line"));
            }
            header = Some(parse_header(line_no, line)?);
            continue;
        }
        let Some(h) = header.as_ref() else {
            return Err(malformed(line_no, "data before the problem line"));
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(malformed(line_no, "expected `<i> <j> <bias>`"));
        }
        let i: usize = fields[0]
            .parse()
            .map_err(|_| malformed(line_no, format!("bad index `{}`", fields[0])))?;
        let j: usize = fields[1]
            .parse()
            .map_err(|_| malformed(line_no, format!("bad index `{}`", fields[1])))?;
        let bias: f64 = fields[2]
            .parse()
            .map_err(|_| malformed(line_no, format!("bad bias `{}`", fields[2])))?;

        if i >= h.max_nodes || j >= h.max_nodes {
            return Err(malformed(
                line_no,
                format!("({i}, {j}) outside 0..{}", h.max_nodes),
            ));
        }
        if i > j {
            return Err(malformed(
                line_no,
                format!("coupler ({i}, {j}) must be written with i < j"),
            ));
        }
        if i == j {
            nodes += 1;
            if nodes > h.n_nodes {
                return Err(malformed(line_no, format!("more than {} nodes", h.n_nodes)));
            }
        } else {
            couplers += 1;
            if couplers > h.n_couplers {
                return Err(malformed(
                    line_no,
                    format!("more than {} couplers", h.n_couplers),
                ));
            }
        }
        terms.push((i, j, bias));
    }

    let Some(h) = header else {
        return Err(QuboError::MalformedProblem("missing problem line".into()));
    };
    if nodes != h.n_nodes {
        return Err(QuboError::MalformedProblem(format!(
            "header declares {} nodes, found {nodes}",
            h.n_nodes
        )));
    }
    if couplers != h.n_couplers {
        return Err(QuboError::MalformedProblem(format!(
            "header declares {} couplers, found {couplers}",
            h.n_couplers
        )));
    }

    Qubo::build(h.max_nodes, terms)
}

/// Writes a QUBO in text format. Only non-zero terms are written.
pub fn write_qubo(qubo: &Qubo) -> String {
    let n_nodes = qubo.linear_biases().iter().filter(|b| **b != 0.0).count();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "p qubo 0 {} {} {}",
        qubo.num_variables(),
        n_nodes,
        qubo.num_couplers()
    );
    for (i, j, bias) in qubo.terms() {
        let _ = writeln!(out, "{i} {j} {bias}");
    }
    out
}
