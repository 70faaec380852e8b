use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::value::{ScriptArgs, ScriptValue};

/// Global-object namespace the bridge installs its functions under
/// (`window.native.*` in the page).
pub const BRIDGE_NAMESPACE: &str = "native";

/// A native callback invocable from page script.
///
/// `Rc` (not `Arc`): script execution and the frame loop share one thread.
pub type BridgeFn = Rc<dyn Fn(&ScriptArgs) -> ScriptValue>;

/// Destination for bridge bindings: one script execution context.
///
/// Implemented by web-engine backends over their real script global object,
/// and by test doubles that just record and invoke the handlers.
pub trait ScriptContext {
    /// Installs `func` as a callable member of `namespace` on the context's
    /// global object.
    fn install_function(&mut self, namespace: &str, name: &str, func: BridgeFn);
}

/// Registry mapping function name → native callback.
///
/// Names are unique; registering under an existing name overwrites. The
/// registry is *copied* into a script context at bind time, not referenced
/// live — callers must re-invoke [`bind_to_context`](Self::bind_to_context)
/// whenever the page creates a new context.
#[derive(Default)]
pub struct BridgeRegistry {
    functions: HashMap<String, BridgeFn>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `func` under `name`, replacing any previous registration.
    pub fn register<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&ScriptArgs) -> ScriptValue + 'static,
    {
        self.functions.insert(name.to_string(), Rc::new(func));
    }

    pub fn unregister(&mut self, name: &str) {
        self.functions.remove(name);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Looks up the callback registered under `name`.
    pub fn get(&self, name: &str) -> Option<&BridgeFn> {
        self.functions.get(name)
    }

    /// Invokes the callback registered under `name` with fault isolation.
    ///
    /// A panic inside the callback is caught at this boundary, logged, and
    /// converted to `ScriptValue::Null` (script sees `undefined`); page
    /// script execution is never aborted by a native-side fault. Unknown
    /// names are logged and also yield `Null`.
    pub fn dispatch(&self, name: &str, args: &ScriptArgs) -> ScriptValue {
        let Some(func) = self.functions.get(name) else {
            log::error!("bridge: function not found: {name}");
            return ScriptValue::Null;
        };

        invoke_guarded(name, func, args)
    }

    /// Installs every currently registered function into `ctx` under
    /// [`BRIDGE_NAMESPACE`], each wrapped with the same fault isolation as
    /// [`dispatch`](Self::dispatch).
    pub fn bind_to_context(&self, ctx: &mut dyn ScriptContext) {
        for (name, func) in &self.functions {
            let guard_name = name.clone();
            let inner = Rc::clone(func);
            let guarded: BridgeFn =
                Rc::new(move |args: &ScriptArgs| invoke_guarded(&guard_name, &inner, args));
            ctx.install_function(BRIDGE_NAMESPACE, name, guarded);
        }

        log::info!(
            "bridge: bound {} functions to window.{}",
            self.functions.len(),
            BRIDGE_NAMESPACE
        );
    }
}

fn invoke_guarded(name: &str, func: &BridgeFn, args: &ScriptArgs) -> ScriptValue {
    match panic::catch_unwind(AssertUnwindSafe(|| func(args))) {
        Ok(value) => value,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            log::error!("bridge: panic in {name}: {msg}");
            ScriptValue::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records installed functions and lets tests invoke them like a page.
    #[derive(Default)]
    struct FakeContext {
        installed: HashMap<(String, String), BridgeFn>,
    }

    impl ScriptContext for FakeContext {
        fn install_function(&mut self, namespace: &str, name: &str, func: BridgeFn) {
            self.installed
                .insert((namespace.to_string(), name.to_string()), func);
        }
    }

    impl FakeContext {
        fn call(&self, name: &str, args: ScriptArgs) -> ScriptValue {
            let func = self
                .installed
                .get(&(BRIDGE_NAMESPACE.to_string(), name.to_string()))
                .expect("function not bound");
            func(&args)
        }
    }

    #[test]
    fn register_then_lookup_returns_callback() {
        let mut reg = BridgeRegistry::new();
        reg.register("ping", |_| ScriptValue::Str("pong".into()));
        assert!(reg.get("ping").is_some());
        assert_eq!(
            reg.dispatch("ping", &ScriptArgs::default()),
            ScriptValue::Str("pong".into())
        );
    }

    #[test]
    fn reregistering_overwrites() {
        let mut reg = BridgeRegistry::new();
        reg.register("f", |_| ScriptValue::Number(1.0));
        reg.register("f", |_| ScriptValue::Number(2.0));
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.dispatch("f", &ScriptArgs::default()),
            ScriptValue::Number(2.0)
        );
    }

    #[test]
    fn unknown_function_yields_null() {
        let reg = BridgeRegistry::new();
        assert_eq!(
            reg.dispatch("missing", &ScriptArgs::default()),
            ScriptValue::Null
        );
    }

    #[test]
    fn panic_in_callback_is_contained() {
        let mut reg = BridgeRegistry::new();
        reg.register("boom", |_| panic!("native fault"));
        assert_eq!(
            reg.dispatch("boom", &ScriptArgs::default()),
            ScriptValue::Null
        );
        // The registry stays usable afterwards.
        reg.register("ok", |_| ScriptValue::Bool(true));
        assert_eq!(
            reg.dispatch("ok", &ScriptArgs::default()),
            ScriptValue::Bool(true)
        );
    }

    #[test]
    fn bind_installs_all_functions_under_namespace() {
        let mut reg = BridgeRegistry::new();
        reg.register("echo", |args| {
            args.get(0).cloned().unwrap_or(ScriptValue::Null)
        });
        reg.register("boom", |_| panic!("native fault"));

        let mut ctx = FakeContext::default();
        reg.bind_to_context(&mut ctx);
        assert_eq!(ctx.installed.len(), 2);

        // Round-trip through the installed handler.
        let out = ctx.call("echo", ScriptArgs::new(vec![ScriptValue::Number(-1.5)]));
        assert_eq!(out, ScriptValue::Number(-1.5));

        // Installed handlers carry the fault boundary too.
        let out = ctx.call("boom", ScriptArgs::default());
        assert_eq!(out, ScriptValue::Null);
    }

    #[test]
    fn marshaling_round_trip_preserves_values() {
        let samples = vec![
            ScriptValue::Null,
            ScriptValue::Bool(true),
            ScriptValue::Bool(false),
            ScriptValue::Number(0.0),
            ScriptValue::Number(-1.5),
            ScriptValue::Str(String::new()),
            ScriptValue::Str("hello".into()),
        ];

        let mut reg = BridgeRegistry::new();
        let seen: Rc<RefCell<Vec<ScriptValue>>> = Rc::default();
        let sink = Rc::clone(&seen);
        reg.register("identity", move |args| {
            let v = args.get(0).cloned().unwrap_or(ScriptValue::Null);
            sink.borrow_mut().push(v.clone());
            v
        });

        for v in &samples {
            let out = reg.dispatch("identity", &ScriptArgs::new(vec![v.clone()]));
            assert_eq!(&out, v);
        }
        assert_eq!(&*seen.borrow(), &samples);
    }
}
