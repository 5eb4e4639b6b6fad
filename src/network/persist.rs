//! Plain-text model format.
//!
//! ```text
//! 3 2 1                 layer sizes, input first
//! w w w w w w           weight matrix of transition 0, row-major by source
//! w w                   weight matrix of transition 1
//! b b                   every hidden-layer bias, concatenated in layer order
//! ```
//!
//! Values are space-separated and use Rust's shortest round-trip `f64`
//! formatting. The bias line is empty when there are no hidden layers.

use std::io::{BufRead, Write};

use crate::error::{NetError, Result};
use crate::math::weights::WeightStore;
use crate::network::topology::Topology;

pub fn write_model<W: Write>(mut out: W, topology: &Topology, weights: &WeightStore) -> Result<()> {
    writeln!(out, "{}", join(topology.sizes()))?;
    for matrix in weights.all_connections() {
        writeln!(out, "{}", join(matrix))?;
    }
    let biases: Vec<f64> = weights.all_biases().iter().flatten().copied().collect();
    writeln!(out, "{}", join(&biases))?;
    out.flush()?;
    Ok(())
}

pub fn read_model<R: BufRead>(input: R) -> Result<(Topology, WeightStore)> {
    let mut lines = input.lines().enumerate().map(|(i, line)| (i + 1, line));

    let (_, header) = lines.next().ok_or_else(|| parse_error(1, "missing layer sizes"))?;
    let sizes = parse_values::<usize>(&header?, 1)?;
    let topology = Topology::new(sizes).map_err(|e| parse_error(1, e.to_string()))?;
    let dims = topology.sizes();
    let hidden = &dims[1..dims.len() - 1];

    let matrix_lens = dims
        .windows(2)
        .map(|pair| pair[0].checked_mul(pair[1]))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| parse_error(1, "layer sizes overflow the weight count"))?;
    let bias_len = hidden
        .iter()
        .try_fold(0usize, |acc, &w| acc.checked_add(w))
        .ok_or_else(|| parse_error(1, "layer sizes overflow the bias count"))?;

    let mut connections = Vec::with_capacity(topology.transitions());
    for (t, &expected) in matrix_lens.iter().enumerate() {
        let line_no = t + 2;
        let (_, line) = lines
            .next()
            .ok_or_else(|| parse_error(line_no, format!("missing weight matrix {t}")))?;
        let values = parse_values::<f64>(&line?, line_no)?;
        expect_count(&values, expected, line_no)?;
        connections.push(values);
    }

    let bias_line_no = topology.transitions() + 2;
    let bias_values = match lines.next() {
        Some((_, line)) => parse_values::<f64>(&line?, bias_line_no)?,
        None => Vec::new(),
    };
    expect_count(&bias_values, bias_len, bias_line_no)?;

    let mut biases = Vec::with_capacity(hidden.len());
    let mut rest = bias_values.as_slice();
    for &width in hidden {
        let (head, tail) = rest.split_at(width);
        biases.push(head.to_vec());
        rest = tail;
    }

    for (line_no, line) in lines {
        if !line?.trim().is_empty() {
            return Err(parse_error(line_no, "unexpected trailing data"));
        }
    }

    let weights = WeightStore::from_parts(&topology, connections, biases)?;
    Ok((topology, weights))
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(T::to_string).collect::<Vec<_>>().join(" ")
}

fn parse_values<T: std::str::FromStr>(line: &str, line_no: usize) -> Result<Vec<T>>
where
    T::Err: std::fmt::Display,
{
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<T>()
                .map_err(|e| parse_error(line_no, format!("bad value {tok:?}: {e}")))
        })
        .collect()
}

fn expect_count<T>(values: &[T], expected: usize, line_no: usize) -> Result<()> {
    if values.len() != expected {
        return Err(parse_error(
            line_no,
            format!("expected {expected} values, found {}", values.len()),
        ));
    }
    Ok(())
}

fn parse_error(line: usize, message: impl Into<String>) -> NetError {
    NetError::Parse {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_transition_writes_empty_bias_line() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let weights = WeightStore::from_parts(&topology, vec![vec![0.5, -2.0]], vec![]).unwrap();
        let mut buf = Vec::new();
        write_model(&mut buf, &topology, &weights).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 1\n0.5 -2\n\n");
    }

    #[test]
    fn rejects_short_matrix_line() {
        let text = "2 2 1\n0.1 0.2 0.3\n0.4 0.5\n0 0\n";
        let err = read_model(text.as_bytes()).unwrap_err();
        assert!(matches!(err, NetError::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let text = "2 1\n0.5 -2\n\n1 2 3\n";
        assert!(matches!(read_model(text.as_bytes()), Err(NetError::Parse { line: 4, .. })));
    }

    #[test]
    fn oversized_header_is_a_parse_error() {
        let err = read_model("4294967296 4294967296\n1\n\n".as_bytes()).unwrap_err();
        assert!(matches!(err, NetError::Parse { line: 1, .. }));

        let huge = usize::MAX.to_string();
        let text = format!("1 {huge} {huge} 1\n");
        assert!(matches!(read_model(text.as_bytes()), Err(NetError::Parse { line: 1, .. })));
    }

    #[test]
    fn rejects_zero_width_header() {
        assert!(matches!(read_model("2 0 1\n".as_bytes()), Err(NetError::Parse { line: 1, .. })));
    }
}
