//! Result buffers
//!
//! A [`ResultBuffer`] collects everything an execution reports: per-qubit
//! measurement outcomes, sampled bitstring counts, named extra information
//! (expectation values, state-vector dumps) and child buffers for batched
//! runs.

use crate::error::Result;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which Z-parity expectation values are stored
pub const EXP_VAL_Z: &str = "exp-val-z";
/// Key for real parts of the state-vector dump
pub const STATEVECT_REAL: &str = "statevect_real";
/// Key for imaginary parts of the state-vector dump
pub const STATEVECT_IMAG: &str = "statevect_imag";

/// Value attached to a buffer under a string key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraInfo {
    Int(i64),
    Double(f64),
    Str(String),
    Doubles(Vec<f64>),
}

impl ExtraInfo {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExtraInfo::Int(v) => Some(*v as f64),
            ExtraInfo::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            ExtraInfo::Doubles(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExtraInfo::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f64> for ExtraInfo {
    fn from(v: f64) -> Self {
        ExtraInfo::Double(v)
    }
}

impl From<i64> for ExtraInfo {
    fn from(v: i64) -> Self {
        ExtraInfo::Int(v)
    }
}

impl From<&str> for ExtraInfo {
    fn from(v: &str) -> Self {
        ExtraInfo::Str(v.to_string())
    }
}

impl From<String> for ExtraInfo {
    fn from(v: String) -> Self {
        ExtraInfo::Str(v)
    }
}

impl From<Vec<f64>> for ExtraInfo {
    fn from(v: Vec<f64>) -> Self {
        ExtraInfo::Doubles(v)
    }
}

/// Sink for the results of one execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBuffer {
    name: String,
    size: usize,
    measurements: BTreeMap<usize, u8>,
    counts: BTreeMap<String, usize>,
    extra_info: BTreeMap<String, ExtraInfo>,
    children: Vec<ResultBuffer>,
}

impl ResultBuffer {
    /// Create an empty buffer for a register of `size` qubits
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            ..Default::default()
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Record a single-qubit outcome, replacing any earlier one
    pub fn measure(&mut self, qubit: usize, outcome: u8) {
        self.measurements.insert(qubit, outcome);
    }

    pub fn measurement(&self, qubit: usize) -> Option<u8> {
        self.measurements.get(&qubit).copied()
    }

    /// Latest outcome per measured qubit, ascending by qubit
    pub fn measurements(&self) -> &BTreeMap<usize, u8> {
        &self.measurements
    }

    /// Measured bits as a string, lowest qubit leftmost
    pub fn measured_bitstring(&self) -> String {
        self.measurements
            .values()
            .map(|&bit| if bit == 0 { '0' } else { '1' })
            .collect()
    }

    /// Count one occurrence of `bitstring`
    pub fn append_measurement(&mut self, bitstring: impl Into<String>) {
        *self.counts.entry(bitstring.into()).or_insert(0) += 1;
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn total_shots(&self) -> usize {
        self.counts.values().sum()
    }

    /// Attach or replace a named value
    pub fn add_extra_info(&mut self, key: impl Into<String>, value: impl Into<ExtraInfo>) {
        self.extra_info.insert(key.into(), value.into());
    }

    pub fn extra_info(&self, key: &str) -> Option<&ExtraInfo> {
        self.extra_info.get(key)
    }

    pub fn has_extra_info(&self, key: &str) -> bool {
        self.extra_info.contains_key(key)
    }

    pub fn extra_info_map(&self) -> &BTreeMap<String, ExtraInfo> {
        &self.extra_info
    }

    /// Attach a child buffer; children keep insertion order
    pub fn append_child(&mut self, child: ResultBuffer) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[ResultBuffer] {
        &self.children
    }

    /// First child named `name`
    pub fn child(&self, name: &str) -> Option<&ResultBuffer> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Z-parity expectation value
    ///
    /// Prefers a recorded `exp-val-z`. Failing that, estimates it from the
    /// sampled counts, each bitstring weighted by the parity of its ones.
    ///
    /// # Example
    /// ```
    /// use qexec_sim::ResultBuffer;
    ///
    /// let mut buffer = ResultBuffer::new("q", 2);
    /// for _ in 0..3 {
    ///     buffer.append_measurement("00");
    /// }
    /// buffer.append_measurement("10");
    /// assert_eq!(buffer.expectation_value_z(), Some(0.5));
    /// ```
    pub fn expectation_value_z(&self) -> Option<f64> {
        if let Some(value) = self.extra_info(EXP_VAL_Z).and_then(ExtraInfo::as_f64) {
            return Some(value);
        }

        let total = self.total_shots();
        if total == 0 {
            return None;
        }
        let signed: i64 = self
            .counts
            .iter()
            .map(|(bits, &count)| {
                let ones = bits.chars().filter(|&c| c == '1').count();
                if ones % 2 == 0 {
                    count as i64
                } else {
                    -(count as i64)
                }
            })
            .sum();
        Some(signed as f64 / total as f64)
    }

    /// State vector reassembled from diagnostics, if recorded
    pub fn state_vector(&self) -> Option<Vec<Complex64>> {
        let real = self.extra_info(STATEVECT_REAL)?.as_doubles()?;
        let imag = self.extra_info(STATEVECT_IMAG)?.as_doubles()?;
        Some(
            real.iter()
                .zip(imag)
                .map(|(&re, &im)| Complex64::new(re, im))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurements_keep_latest() {
        let mut buffer = ResultBuffer::new("b", 3);
        buffer.measure(2, 1);
        buffer.measure(0, 0);
        buffer.measure(2, 0);
        assert_eq!(buffer.measurement(2), Some(0));
        assert_eq!(buffer.measurement(1), None);
        assert_eq!(buffer.measured_bitstring(), "00");
    }

    #[test]
    fn test_counts() {
        let mut buffer = ResultBuffer::new("b", 2);
        buffer.append_measurement("01");
        buffer.append_measurement("01");
        buffer.append_measurement("11");
        assert_eq!(buffer.counts().get("01"), Some(&2));
        assert_eq!(buffer.total_shots(), 3);
    }

    #[test]
    fn test_recorded_expectation_wins() {
        let mut buffer = ResultBuffer::new("b", 1);
        buffer.append_measurement("1");
        buffer.add_extra_info(EXP_VAL_Z, 0.25);
        assert_eq!(buffer.expectation_value_z(), Some(0.25));
    }

    #[test]
    fn test_expectation_absent() {
        assert_eq!(ResultBuffer::new("b", 1).expectation_value_z(), None);
    }

    #[test]
    fn test_children_by_name() {
        let mut parent = ResultBuffer::new("parent", 2);
        let mut child = ResultBuffer::new("zz", 2);
        child.add_extra_info(EXP_VAL_Z, -1.0);
        parent.append_child(child);
        parent.append_child(ResultBuffer::new("xx", 2));

        assert_eq!(parent.children().len(), 2);
        assert_eq!(parent.child("zz").and_then(ResultBuffer::expectation_value_z), Some(-1.0));
        assert!(parent.child("yy").is_none());
    }

    #[test]
    fn test_state_vector_dump() {
        let mut buffer = ResultBuffer::new("b", 1);
        assert!(buffer.state_vector().is_none());
        buffer.add_extra_info(STATEVECT_REAL, vec![0.0, 1.0]);
        buffer.add_extra_info(STATEVECT_IMAG, vec![0.5, 0.0]);
        assert_eq!(
            buffer.state_vector(),
            Some(vec![Complex64::new(0.0, 0.5), Complex64::new(1.0, 0.0)])
        );
    }

    #[test]
    fn test_json_shape() {
        let mut buffer = ResultBuffer::new("run", 2);
        buffer.measure(0, 1);
        buffer.add_extra_info(EXP_VAL_Z, -1.0);
        buffer.add_extra_info("backend", "statevector");

        let value: serde_json::Value = serde_json::from_str(&buffer.to_json().unwrap()).unwrap();
        assert_eq!(value["name"], "run");
        assert_eq!(value["measurements"]["0"], 1);
        assert_eq!(value["extra_info"]["exp-val-z"], -1.0);
        assert_eq!(value["extra_info"]["backend"], "statevector");
    }
}
