use crate::treewalk::{types::Exception, DomainResult, TreewalkValue};

/// The evaluated arguments of a call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<TreewalkValue>,
    keyword: Vec<(String, TreewalkValue)>,
}

impl Args {
    pub fn new(positional: Vec<TreewalkValue>) -> Self {
        Self {
            positional,
            keyword: vec![],
        }
    }

    pub fn with_keywords(mut self, keyword: Vec<(String, TreewalkValue)>) -> Self {
        self.keyword = keyword;
        self
    }

    /// Prepend the receiver of a bound method.
    pub fn with_bound(mut self, receiver: TreewalkValue) -> Self {
        self.positional.insert(0, receiver);
        self
    }

    pub fn positional(&self) -> &[TreewalkValue] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, TreewalkValue)] {
        &self.keyword
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    pub fn get_arg(&self, index: usize) -> Option<&TreewalkValue> {
        self.positional.get(index)
    }

    /// The positional argument at `index`, or `TreewalkValue::None` when absent.
    pub fn get_arg_or_none(&self, index: usize) -> TreewalkValue {
        self.positional
            .get(index)
            .cloned()
            .unwrap_or(TreewalkValue::None)
    }

    pub fn get_kwarg(&self, name: &str) -> Option<&TreewalkValue> {
        self.keyword.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn into_parts(self) -> (Vec<TreewalkValue>, Vec<(String, TreewalkValue)>) {
        (self.positional, self.keyword)
    }
}

/// Check the positional argument count of a builtin.
pub fn check_args(args: &Args, name: &str, min: usize, max: usize) -> DomainResult<()> {
    let given = args.len();
    if given >= min && given <= max {
        return Ok(());
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let message = if min == max {
        format!(
            "{name}() takes exactly {min} argument{} ({given} given)",
            plural(min)
        )
    } else if given < min {
        format!(
            "{name} expected at least {min} argument{}, got {given}",
            plural(min)
        )
    } else {
        format!(
            "{name} expected at most {max} argument{}, got {given}",
            plural(max)
        )
    };
    Err(Exception::type_error(message))
}

/// Reject keyword arguments for builtins which only take positional ones.
pub fn no_keywords(args: &Args, name: &str) -> DomainResult<()> {
    if args.keyword().is_empty() {
        Ok(())
    } else {
        Err(Exception::type_error(format!(
            "{name}() takes no keyword arguments"
        )))
    }
}
