/// Sample x class enrichment scores at full precision.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub samples: Vec<String>,
    pub classes: Vec<String>,
    pub scores: Vec<Vec<f64>>,
}

impl ScoreTable {
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
impl ScoreTable {
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn score(&self, sample: &str, class: &str) -> Option<f64> {
        let row = self.samples.iter().position(|s| s == sample)?;
        let col = self.classes.iter().position(|c| c == class)?;
        Some(self.scores[row][col])
    }

    pub fn row(&self, sample: &str) -> Option<&[f64]> {
        let row = self.samples.iter().position(|s| s == sample)?;
        Some(&self.scores[row])
    }
}
