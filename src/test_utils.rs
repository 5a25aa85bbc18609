use std::sync::OnceLock;

use jni::{AttachGuard, InitArgsBuilder, JNIVersion, JavaVM};

static JVM: OnceLock<JavaVM> = OnceLock::new();

fn jvm() -> &'static JavaVM {
    JVM.get_or_init(|| {
        let args = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option("-Xcheck:jni")
            .build()
            .unwrap();
        JavaVM::new(args).unwrap()
    })
}

/// Attaches the current test thread to the shared VM.
pub fn attach() -> AttachGuard<'static> {
    jvm().attach_current_thread().unwrap()
}
