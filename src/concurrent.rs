use intl_memoizer::{concurrent::IntlLangMemoizer, Memoizable};
use rustc_hash::FxHashMap;
use unic_langid::LanguageIdentifier;

use crate::bundle::FluentBundleBase;
use crate::memoizer::MemoizerKind;
use crate::FluentResource;

/// A bundle over the `Mutex`-backed memoizer, safe to share across threads
/// once all resources and functions are in place.
pub type FluentBundle<R = FluentResource> = FluentBundleBase<R, IntlLangMemoizer>;

impl<R> FluentBundleBase<R, IntlLangMemoizer> {
    /// A constructor analogous to [`FluentBundleBase::new`] but operating
    /// on a concurrent version of
    /// [`IntlLangMemoizer`](intl_memoizer::concurrent::IntlLangMemoizer)
    /// over [`Mutex`](std::sync::Mutex).
    ///
    /// # Example
    ///
    /// ```
    /// use ftl_runtime::concurrent::FluentBundle;
    /// use ftl_runtime::FluentResource;
    /// use unic_langid::langid;
    ///
    /// let langid_en = langid!("en-US");
    /// let mut bundle: FluentBundle<FluentResource> =
    ///     FluentBundle::new_concurrent(vec![langid_en]);
    /// ```
    pub fn new_concurrent(locales: Vec<LanguageIdentifier>) -> Self {
        let first_locale = locales.first().cloned().unwrap_or_default();
        Self {
            locales,
            resources: vec![],
            entries: FxHashMap::default(),
            intls: IntlLangMemoizer::new(first_locale),
            use_isolating: true,
            transform: None,
            formatter: None,
        }
    }
}

impl MemoizerKind for IntlLangMemoizer {
    fn new(lang: LanguageIdentifier) -> Self {
        Self::new(lang)
    }

    fn with_try_get_threadsafe<I, R, U>(&self, args: I::Args, cb: U) -> Result<R, I::Error>
    where
        Self: Sized,
        I: Memoizable + Send + Sync + 'static,
        I::Args: Send + Sync + 'static,
        U: FnOnce(&I) -> R,
    {
        self.with_try_get(args, cb)
    }
}
