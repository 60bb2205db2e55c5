use std::fmt::Display;

#[derive(Debug, Default)]
pub(crate) struct SmokeReport {
    passed: usize,
    failed: usize,
}

impl SmokeReport {
    pub(crate) fn pass(&mut self, step: &str, detail: impl Display) {
        self.passed += 1;
        println!("{}", status_line("PASS", step, detail));
    }

    pub(crate) fn fail(&mut self, step: &str, err: impl Display) {
        self.failed += 1;
        println!("{}", status_line("FAIL", step, err));
    }

    pub(crate) fn skip(&mut self, step: &str, reason: &str) {
        println!("{}", status_line("SKIP", step, reason));
    }

    /// Records a step outcome and hands back the value when it succeeded.
    pub(crate) fn record<T>(
        &mut self,
        step: &str,
        result: anyhow::Result<T>,
        detail: impl FnOnce(&T) -> String,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                self.pass(step, detail(&value));
                Some(value)
            }
            Err(err) => {
                self.fail(step, format!("{err:#}"));
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn failed(&self) -> usize {
        self.failed
    }

    pub(crate) fn finish(self) -> anyhow::Result<()> {
        let total = self.passed + self.failed;
        if self.failed > 0 {
            anyhow::bail!("smoke run failed: {} of {} steps failed", self.failed, total);
        }
        println!("smoke run passed: {total} steps");
        Ok(())
    }
}

pub(crate) fn status_line(status: &str, step: &str, detail: impl Display) -> String {
    format!("{status:<4}  {step:<9}  {detail}")
}
