//! Preparing the staged site directory (`site.tmp`) a module renders from.

use crate::locale::Locales;
use log::{debug, warn};
use quire_resource::{
    Excludes, StageError, copy_directory_structure, copy_file, create_dir_all, directory_names,
    file_names, remove_default_excludes,
};
use quire_types::Locale;
use std::path::{Path, PathBuf};

/// Copies `site_dir` into `tmp_dir` without SCM metadata, then merges in
/// `generated_site_dir`.
pub fn prepare_site_directory(
    site_dir: &Path,
    generated_site_dir: &Path,
    tmp_dir: &Path,
    locales: &Locales,
) -> Result<(), StageError> {
    create_dir_all(tmp_dir)?;

    if site_dir.is_dir() {
        let copied = copy_directory_structure(site_dir, tmp_dir, &Excludes::defaults())?;
        debug!("Staged {} site files into {}", copied, tmp_dir.display());
    }
    remove_default_excludes(tmp_dir)?;

    merge_generated_site(generated_site_dir, site_dir, tmp_dir, locales)
}

/// Copies generated sources from `from` into `to` for every locale.
///
/// Files that `site_dir` already provides win over generated ones. For a
/// non-default locale only `from/<lang>` is merged, into `to/<lang>`.
pub fn merge_generated_site(
    from: &Path,
    site_dir: &Path,
    to: &Path,
    locales: &Locales,
) -> Result<(), StageError> {
    if !from.is_dir() {
        return Ok(());
    }
    let excludes = Excludes::with_locales(locales.ordered(), locales.default_locale());

    for locale in locales.ordered() {
        let is_default = locales.is_default(locale);
        let lang = locale.language();

        let site_lang = site_dir.join(lang);
        let site_files = if !is_default && site_lang.is_dir() {
            file_names(&site_lang, &excludes)?
        } else {
            file_names(site_dir, &excludes)?
        };

        let from_lang = from.join(lang);
        let generated_files = if !is_default && from_lang.is_dir() {
            file_names(&from_lang, &excludes)?
        } else {
            file_names(from, &excludes)?
        };

        for generated in generated_files {
            if site_files.contains(&generated) {
                warn!(
                    "Generated-site already contains a file in site: {}. Ignoring copying it!",
                    generated.display()
                );
                continue;
            }

            if is_default {
                copy_file(&from.join(&generated), &to.join(&generated))?;
            } else if from_lang.is_dir() {
                copy_file(&from_lang.join(&generated), &to.join(lang).join(&generated))?;
            }
        }
    }
    Ok(())
}

/// Whether the site sources already hold a `<dir>/<output_name>.*` document
/// for `locale`.
pub fn site_provides(
    site_dir: &Path,
    output_name: &str,
    locale: &Locale,
    locales: &Locales,
) -> Result<bool, StageError> {
    let dir = locales.locale_directory(site_dir, locale);
    if !dir.is_dir() {
        return Ok(false);
    }
    let excludes = Excludes::with_locales(locales.ordered(), locales.default_locale());
    let prefix = format!("{output_name}.");

    Ok(file_names(&dir, &excludes)?.iter().any(|file| {
        file.components().count() == 2
            && file
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
    }))
}

/// Where a generated report source goes: `<generated>/xdoc` for the default
/// locale, `<generated>/<lang>/xdoc` otherwise.
pub fn report_output_directory(generated_tmp: &Path, locale: &Locale, locales: &Locales) -> PathBuf {
    locales.locale_directory(generated_tmp, locale).join("xdoc")
}

/// The documents `generated_site_dir` holds for `locale`, as `(ref, file)`
/// pairs in format-directory order.
///
/// Documents live in format directories (`xdoc/`, `apt/`, ...) of the
/// generated site, or of its `<lang>` directory for a non-default locale. A
/// document's ref is its path inside the format directory without the
/// extension; files without an extension are skipped.
pub fn generated_documents(
    generated_site_dir: &Path,
    locale: &Locale,
    locales: &Locales,
) -> Result<Vec<(String, PathBuf)>, StageError> {
    let base = locales.locale_directory(generated_site_dir, locale);
    if !base.is_dir() {
        return Ok(Vec::new());
    }
    let excludes = Excludes::with_locales(locales.ordered(), locales.default_locale());
    let is_locale_dir = |name: &str| {
        locales
            .ordered()
            .iter()
            .any(|l| !locales.is_default(l) && l.language() == name)
    };

    let mut documents = Vec::new();
    for format in directory_names(&base, &excludes)? {
        if locales.is_default(locale) && is_locale_dir(&format) {
            continue;
        }
        let format_dir = base.join(&format);
        for file in file_names(&format_dir, &excludes)? {
            if file.extension().is_none() {
                continue;
            }
            let reference = file
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            documents.push((reference, format_dir.join(file)));
        }
    }
    Ok(documents)
}
