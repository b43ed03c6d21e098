use crate::AppResult;
use console::Term;
use indicatif::ProgressBar;

/// Writes user-facing lines either straight to the terminal or above a
/// running spinner, so lookups in flight don't garble the output.
#[derive(Debug, Clone)]
pub struct AppReporter<'a> {
    inner: AppReporterInner<'a>,
}

impl<'a> AppReporter<'a> {
    pub fn report<S>(&self, message: S) -> AppResult<()>
    where
        S: AsRef<str>,
    {
        match &self.inner {
            AppReporterInner::Term(term) => Ok(term.write_line(message.as_ref())?),
            AppReporterInner::Spinner(spinner) => {
                spinner.println(message.as_ref());
                Ok(())
            }
        }
    }

    pub fn set_status<S>(&self, status: S)
    where
        S: Into<String>,
    {
        if let AppReporterInner::Spinner(spinner) = &self.inner {
            spinner.set_message(status.into());
        }
    }
}

#[derive(Debug, Clone)]
enum AppReporterInner<'a> {
    Term(&'a Term),
    Spinner(&'a ProgressBar),
}

impl<'a> From<&'a Term> for AppReporter<'a> {
    fn from(term: &'a Term) -> Self {
        AppReporter {
            inner: AppReporterInner::Term(term),
        }
    }
}

impl<'a> From<&'a ProgressBar> for AppReporter<'a> {
    fn from(spinner: &'a ProgressBar) -> Self {
        AppReporter {
            inner: AppReporterInner::Spinner(spinner),
        }
    }
}
