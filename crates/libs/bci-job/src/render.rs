//! Job template rendering.
//!
//! Templates are Jinja files rendered with [`minijinja`] against the
//! [`JobDescriptor`] fields. They may branch on those fields, for instance
//! on `rootfs_type`.

use std::path::PathBuf;

use minijinja::{Environment, UndefinedBehavior, Value};
use tracing::debug;

use crate::{descriptor::JobDescriptor, prelude::*};

/// Turns a descriptor into job text.
pub trait Render: Send + Sync {
    fn render(&self, template: &str, job: &JobDescriptor) -> Result<String>;
}

/// Renders templates found in a directory.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    dir: PathBuf,
}

impl TemplateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Render for TemplateDir {
    fn render(&self, template: &str, job: &JobDescriptor) -> Result<String> {
        let path = self.dir.join(template);
        debug!("Using template {}", path.display());
        let text = std::fs::read_to_string(&path)
            .map_err(|source| Error::TemplateNotFound { path, source })?;
        render_text(template, &text, job)
    }
}

/// Render the template source `text`.
///
/// Lists render as inline YAML sequences and absent values as empty
/// strings. Referencing a field jobs don't have is an error.
pub fn render_text(template: &str, text: &str, job: &JobDescriptor) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_formatter(|out, state, value| {
        if value.is_none() {
            Ok(())
        } else {
            minijinja::escape_formatter(out, state, value)
        }
    });

    env.render_str(text, Value::from_serialize(job))
        .map_err(|source| Error::Template {
            template: template.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use minijinja::ErrorKind;

    use super::*;
    use crate::descriptor::RootfsType;

    fn job() -> JobDescriptor {
        JobDescriptor {
            kernel: String::from("http://farm/zImage"),
            device_tree: String::from("http://farm/dtbs/armada-370-db.dtb"),
            rootfs: String::from("http://farm/rootfs.cpio.gz"),
            rootfs_type: RootfsType::Ramdisk,
            modules: String::new(),
            test: String::from("boot"),
            lava_server: String::new(),
            lava_stream: String::new(),
            device_type: String::from("armada-370-db"),
            job_name: String::from("armada-370-db--mainline--multi_v7_defconfig--boot"),
            notify: vec![String::from("a@example.com")],
            notify_on_incomplete: Vec::new(),
            timeout: None,
        }
    }

    #[test]
    fn fields_are_replaced() {
        let text = "job_name: {{ job_name }}\ntype: {{rootfs_type}}\nmodules: '{{ modules }}'\n\
                    timeout: '{{ timeout }}'\n";
        assert_eq!(
            render_text("t", text, &job()).unwrap(),
            "job_name: armada-370-db--mainline--multi_v7_defconfig--boot\ntype: ramdisk\n\
             modules: ''\ntimeout: ''\n"
        );
    }

    #[test]
    fn lists_are_inline_sequences() {
        let text = render_text("t", "to: {{ notify }}\ncc: {{ notify_on_incomplete }}", &job()).unwrap();
        assert!(text.contains("a@example.com"));
        assert!(text.starts_with("to: ["));
        assert!(text.ends_with("cc: []"));
    }

    #[test]
    fn templates_branch_on_fields() {
        let text = "commands: {{ 'ramdisk' if rootfs_type == 'ramdisk' else 'nfs' }}\n\
                    {% if timeout %}\n\
                    minutes: {{ timeout }}\n\
                    {% endif %}\n\
                    end\n";
        assert_eq!(render_text("t", text, &job()).unwrap(), "commands: ramdisk\nend\n");

        let nfs = JobDescriptor {
            rootfs_type: RootfsType::Nfs,
            timeout: Some(120),
            ..job()
        };
        assert_eq!(
            render_text("t", text, &nfs).unwrap(),
            "commands: nfs\nminutes: 120\nend\n"
        );
    }

    #[test]
    fn unknown_field() {
        let result = render_text("t", "{{ kernel_url }}", &job());
        assert!(matches!(
            result,
            Err(Error::Template { source, .. }) if source.kind() == ErrorKind::UndefinedError
        ));
    }

    #[test]
    fn unterminated_expression() {
        let result = render_text("t", "kernel: {{ kernel", &job());
        assert!(matches!(
            result,
            Err(Error::Template { source, .. }) if source.kind() == ErrorKind::SyntaxError
        ));
    }

    #[test]
    fn missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TemplateDir::new(dir.path()).render("missing.jinja", &job());
        assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
    }
}
