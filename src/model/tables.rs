use std::collections::HashMap;

/// Gene x class marker weights. Row order follows the source file, column
/// order follows the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerTable {
    pub classes: Vec<String>,
    pub genes: Vec<String>,
    pub weights: Vec<Vec<f64>>,
    gene_index: HashMap<String, usize>,
}

impl MarkerTable {
    pub fn new(classes: Vec<String>) -> Self {
        Self {
            classes,
            ..Self::default()
        }
    }

    /// Appends a gene row. Returns false and leaves the table untouched when
    /// the gene is already present.
    pub fn push_gene(&mut self, gene: String, weights: Vec<f64>) -> bool {
        debug_assert_eq!(weights.len(), self.classes.len());
        if self.gene_index.contains_key(&gene) {
            return false;
        }
        self.gene_index.insert(gene.clone(), self.genes.len());
        self.genes.push(gene);
        self.weights.push(weights);
        true
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn gene_row(&self, gene: &str) -> Option<usize> {
        self.gene_index.get(gene).copied()
    }
}

#[cfg(test)]
impl MarkerTable {
    pub fn weight(&self, gene: &str, class: &str) -> Option<f64> {
        let row = self.gene_row(gene)?;
        let col = self.classes.iter().position(|c| c == class)?;
        Some(self.weights[row][col])
    }
}

/// Gene x sample expression values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionTable {
    pub samples: Vec<String>,
    pub genes: Vec<String>,
    pub values: Vec<Vec<f64>>,
    gene_index: HashMap<String, usize>,
}

impl ExpressionTable {
    pub fn new(samples: Vec<String>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }

    pub fn push_gene(&mut self, gene: String, values: Vec<f64>) -> bool {
        debug_assert_eq!(values.len(), self.samples.len());
        if self.gene_index.contains_key(&gene) {
            return false;
        }
        self.gene_index.insert(gene.clone(), self.genes.len());
        self.genes.push(gene);
        self.values.push(values);
        true
    }

    /// Same genes and samples, values replaced. Used by normalization.
    pub fn with_values(&self, values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.genes.len());
        Self {
            samples: self.samples.clone(),
            genes: self.genes.clone(),
            values,
            gene_index: self.gene_index.clone(),
        }
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn gene_row(&self, gene: &str) -> Option<usize> {
        self.gene_index.get(gene).copied()
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0f64; self.samples.len()];
        for row in &self.values {
            for (col, &v) in row.iter().enumerate() {
                sums[col] += v;
            }
        }
        sums
    }
}

#[cfg(test)]
impl ExpressionTable {
    pub fn value(&self, gene: &str, sample: &str) -> Option<f64> {
        let row = self.gene_row(gene)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.values[row][col])
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/tables.rs"]
mod tests;
