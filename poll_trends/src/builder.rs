pub use crate::config::*;

/// A builder for adding poll records one by one.
///
/// The records must be added in the order of the source table: the upper flags
/// are computed on consecutive pairs.
///
/// ```
/// pub use poll_trends::builder::Builder;
/// pub use poll_trends::TransformRules;
/// # use poll_trends::TransformError;
///
/// let mut builder = Builder::new(&TransformRules::DEFAULT_RULES);
///
/// builder.add_result("2016", "Trump", "R", 1, 40);
/// builder.add_result("2016", "Clinton", "D", 1, 45);
///
/// let grouped = builder.build()?;
/// assert_eq!(grouped.years.len(), 1);
/// assert_eq!(grouped.series("2016", "Clinton").unwrap().records[0].upper, Some(true));
///
/// # Ok::<(), TransformError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TransformRules,
    pub(crate) _records: Vec<RawRecord>,
}

impl Builder {
    pub fn new(rules: &TransformRules) -> Builder {
        Builder {
            _rules: rules.clone(),
            _records: Vec::new(),
        }
    }

    /// Adds a record whose numbers are already known.
    pub fn add_result(
        &mut self,
        year: &str,
        candidate: &str,
        party: &str,
        month: i32,
        result: i32,
    ) {
        self.add_raw(RawRecord::new(
            year,
            candidate,
            party,
            &month.to_string(),
            &result.to_string(),
        ))
    }

    /// Adds a record as read from a table. The numbers are checked by [Builder::build].
    pub fn add_raw(&mut self, record: RawRecord) {
        self._records.push(record);
    }

    pub fn len(&self) -> usize {
        self._records.len()
    }

    pub fn is_empty(&self) -> bool {
        self._records.is_empty()
    }

    pub fn build(&self) -> Result<GroupedStructure, TransformError> {
        crate::transform_with_rules(&self._records, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_reports_bad_numbers() {
        let mut builder = Builder::new(&TransformRules::DEFAULT_RULES);
        builder.add_result("2016", "A", "R", 1, 40);
        builder.add_raw(RawRecord::new("2016", "B", "D", "one", "45"));
        assert_eq!(builder.len(), 2);
        assert!(matches!(
            builder.build(),
            Err(TransformError::Parse {
                index: 1,
                field: Field::Month,
                ..
            })
        ));
    }

    #[test]
    fn empty_builder() {
        let builder = Builder::new(&TransformRules::default());
        assert!(builder.is_empty());
        assert_eq!(builder.build().unwrap(), GroupedStructure::default());
    }
}
