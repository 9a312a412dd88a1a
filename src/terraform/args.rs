/// Argument vector builder.
///
/// Tokens always come out as: sub-command tokens, then options in the order
/// they were added, then positional arguments. Terraform stops parsing flags
/// at the first positional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    subcommand: Vec<String>,
    options: Vec<String>,
    positionals: Vec<String>,
}

impl CommandArgs {
    pub fn new<I, S>(subcommand: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            subcommand: subcommand.into_iter().map(|s| s.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options
            .extend(options.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn positional(mut self, arg: impl Into<String>) -> Self {
        self.positionals.push(arg.into());
        self
    }

    pub fn positionals<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.positionals
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn into_vec(self) -> Vec<String> {
        let mut args = self.subcommand;
        args.extend(self.options);
        args.extend(self.positionals);
        args
    }
}

/// True if any option starts with `prefix`, e.g. `-state=`
pub fn has_prefix_option(options: &[&str], prefix: &str) -> bool {
    options.iter().any(|opt| opt.starts_with(prefix))
}

/// Value of the last option starting with `prefix`, e.g. `foo.tfplan` for `-out=foo.tfplan`
pub fn option_value<'a>(options: &[&'a str], prefix: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find_map(|opt| opt.strip_prefix(prefix))
}
