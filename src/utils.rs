/// Running arithmetic mean of the values fed so far.
#[derive(Default, Debug, Clone)]
pub struct RunningMean {
    total: f64,
    length: usize,
}

impl RunningMean {
    pub fn feed(&mut self, value: f64) {
        self.total += value;
        self.length += 1;
    }

    pub fn clear(&mut self) {
        self.total = f64::default();
        self.length = 0;
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// `None` until something has been fed.
    pub fn avg(&self) -> Option<f64> {
        (self.length > 0).then(|| self.total / self.length as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::RunningMean;

    #[test]
    fn unittest_running_mean() {
        let mut mean = RunningMean::default();
        assert_eq!(mean.avg(), None);

        mean.feed(10.0);
        mean.feed(20.0);
        assert_eq!(mean.len(), 2);
        assert_eq!(mean.avg(), Some(15.0));

        mean.clear();
        assert!(mean.is_empty());
        assert_eq!(mean.avg(), None);
    }
}
