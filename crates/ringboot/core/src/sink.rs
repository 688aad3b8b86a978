//! Phase sinks: where orchestrator phase lines go.

use tracing::info;

/// Receives one line per boot event.
pub trait PhaseSink {
    fn emit(&mut self, line: &str);
}

/// Collects lines in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl PhaseSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Forwards lines to `tracing` under the `ringboot::phase` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl PhaseSink for TracingSink {
    fn emit(&mut self, line: &str) {
        info!(target: "ringboot::phase", "{}", line);
    }
}

/// Prints lines to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl PhaseSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{}", line);
    }
}

impl<S: PhaseSink + ?Sized> PhaseSink for &mut S {
    fn emit(&mut self, line: &str) {
        (**self).emit(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_collects_in_order() {
        let mut sink = MemorySink::new();
        sink.emit("a");
        sink.emit("b");
        assert_eq!(sink.lines(), ["a", "b"]);
        assert_eq!(sink.into_lines(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn sink_through_trait_object() {
        let mut sink = MemorySink::new();
        {
            let dynamic: &mut dyn PhaseSink = &mut sink;
            dynamic.emit("line");
        }
        assert_eq!(sink.lines().len(), 1);
    }
}
