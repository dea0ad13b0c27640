use crate::{
    domain::{Category, Seq},
    error::{ModelError, ModelResult},
    spec::TaskSpec,
    strategy::Strategy,
};

/// Validated arguments of the standalone task entry point (`<category> <count>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryArgs {
    pub category: Category,
    pub count: u32,
}

impl EntryArgs {
    /// Number of positional arguments the entry point consumes.
    pub const ARITY: usize = 2;

    /// Validate raw positional arguments.
    ///
    /// Checks run in this order:
    /// 1. at least two arguments (any beyond the second are ignored);
    /// 2. both are integers;
    /// 3. category is within `1..=4`;
    /// 4. count is positive.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> ModelResult<Self> {
        if args.len() < Self::ARITY {
            return Err(ModelError::ArgumentCount {
                expected: Self::ARITY,
                actual: args.len(),
            });
        }
        let category = parse_int("category", args[0].as_ref())?;
        let count = parse_int("count", args[1].as_ref())?;

        let category = Category::try_from(category)?;
        if count <= 0 {
            return Err(ModelError::NonPositiveCount(count));
        }
        let count = u32::try_from(count)
            .map_err(|_| ModelError::Invalid(format!("count {count} is too large")))?;

        Ok(Self { category, count })
    }

    /// Positional form handed to a child process.
    pub fn to_args(&self) -> [String; 2] {
        [self.category.to_string(), self.count.to_string()]
    }

    /// Spec of the single task a standalone invocation runs.
    ///
    /// A standalone run is a batch of one, so its sequence number is 1.
    pub fn to_spec(&self) -> TaskSpec {
        const STANDALONE_SEQ: Seq = 1;
        TaskSpec::new(Strategy::Process, self.category, STANDALONE_SEQ, self.count)
    }
}

impl From<&TaskSpec> for EntryArgs {
    fn from(spec: &TaskSpec) -> Self {
        Self {
            category: spec.category,
            count: spec.index,
        }
    }
}

fn parse_int(field: &'static str, value: &str) -> ModelResult<i64> {
    value.parse::<i64>().map_err(|_| ModelError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}
