// src/domain/shared/either.rs
//
// Success-or-failure container used where failures are data rather than
// errors to propagate (existence checks, value object construction).

/// Exactly one of the two slots is filled, by construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<T, E> {
    Ok(T),
    Fail(E),
}

/// One slot yielded when iterating an [`Either`]
#[derive(Debug, PartialEq, Eq)]
pub enum Slot<'a, T, E> {
    Ok(Option<&'a T>),
    Fail(Option<&'a E>),
}

impl<T, E> Either<T, E> {
    pub fn ok(value: T) -> Self {
        Either::Ok(value)
    }

    pub fn fail(error: E) -> Self {
        Either::Fail(error)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Either::Ok(_))
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Either::Fail(_))
    }

    pub fn ok_value(&self) -> Option<&T> {
        match self {
            Either::Ok(value) => Some(value),
            Either::Fail(_) => None,
        }
    }

    pub fn err_value(&self) -> Option<&E> {
        match self {
            Either::Ok(_) => None,
            Either::Fail(error) => Some(error),
        }
    }

    /// Transform the success payload, leaving a failure untouched
    pub fn map<U, F>(self, f: F) -> Either<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Either::Ok(value) => Either::Ok(f(value)),
            Either::Fail(error) => Either::Fail(error),
        }
    }

    pub fn map_err<E2, F>(self, f: F) -> Either<T, E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Either::Ok(value) => Either::Ok(value),
            Either::Fail(error) => Either::Fail(f(error)),
        }
    }

    /// Sequence a dependent fallible step. The failure type may widen: the
    /// current failure only has to convert into the next step's failure type.
    pub fn chain<U, E2, F>(self, f: F) -> Either<U, E2>
    where
        F: FnOnce(T) -> Either<U, E2>,
        E: Into<E2>,
    {
        match self {
            Either::Ok(value) => f(value),
            Either::Fail(error) => Either::Fail(error.into()),
        }
    }

    /// Destructure into `(ok, err)`; exactly one side is `Some`
    pub fn as_array(self) -> (Option<T>, Option<E>) {
        match self {
            Either::Ok(value) => (Some(value), None),
            Either::Fail(error) => (None, Some(error)),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Either::Ok(value) => Ok(value),
            Either::Fail(error) => Err(error),
        }
    }

    /// Yields the success slot, then the failure slot, always both
    pub fn iter(&self) -> std::array::IntoIter<Slot<'_, T, E>, 2> {
        [Slot::Ok(self.ok_value()), Slot::Fail(self.err_value())].into_iter()
    }
}

impl<T, E> Either<Vec<T>, E> {
    /// Apply `f` to every element without short-circuiting.
    ///
    /// If any element fails, the result is a single failure carrying every
    /// element error in input order. A failure already held by `self` is
    /// carried forward as a one-element list.
    pub fn chain_each<U, F>(self, mut f: F) -> Either<Vec<U>, Vec<E>>
    where
        F: FnMut(T) -> Either<U, E>,
    {
        let items = match self {
            Either::Ok(items) => items,
            Either::Fail(error) => return Either::Fail(vec![error]),
        };

        let mut values = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for item in items {
            match f(item) {
                Either::Ok(value) => values.push(value),
                Either::Fail(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Either::Ok(values)
        } else {
            Either::Fail(errors)
        }
    }
}

impl<T, E> From<Either<T, E>> for (Option<T>, Option<E>) {
    fn from(either: Either<T, E>) -> Self {
        either.as_array()
    }
}

impl<T, E> From<Result<T, E>> for Either<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Either::Ok(value),
            Err(error) => Either::Fail(error),
        }
    }
}

impl<'a, T, E> IntoIterator for &'a Either<T, E> {
    type Item = Slot<'a, T, E>;
    type IntoIter = std::array::IntoIter<Slot<'a, T, E>, 2>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
