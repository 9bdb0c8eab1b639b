use crate::{stmt, Result};

use std::{fmt, sync::Arc};

/// Builds an instance from positional argument values.
pub type Build<T> = Arc<dyn Fn(Vec<stmt::Value>) -> Result<T> + Send + Sync>;

/// A constructor taking arguments, selected by its argument types.
pub struct Constructor<T> {
    pub args: Vec<stmt::Type>,
    build: Build<T>,
}

impl<T> Constructor<T> {
    pub fn new<F>(args: Vec<stmt::Type>, build: F) -> Self
    where
        F: Fn(Vec<stmt::Value>) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            args,
            build: Arc::new(build),
        }
    }

    pub fn build(&self) -> &Build<T> {
        &self.build
    }

    pub fn accepts(&self, args: &[stmt::Type]) -> bool {
        self.args == args
    }

    /// Wraps every constructed value with `wrap`.
    pub fn map<U: 'static>(&self, wrap: Arc<dyn Fn(T) -> U + Send + Sync>) -> Constructor<U>
    where
        T: 'static,
    {
        let build = self.build.clone();
        Constructor::new(self.args.clone(), move |args| build(args).map(&*wrap))
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            args: self.args.clone(),
            build: self.build.clone(),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor").field("args", &self.args).finish()
    }
}
