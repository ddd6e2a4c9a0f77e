//! The [`rule!`] macro: declarative single-condition rules with minimal
//! boilerplate.

/// Creates a complete rule: unit struct, [`Rule`](crate::rule::Rule)
/// implementation, and optionally a factory function.
///
/// This covers the common shape where a rule flags one condition and
/// reports one message. Rules that branch into several distinct messages
/// implement [`Rule`](crate::rule::Rule) by hand instead.
///
/// `#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]` is always applied.
///
/// # Variants
///
/// **Mandatory rule** (the default severity) **with factory fn**:
/// ```rust,ignore
/// rule! {
///     /// Volumes must be encrypted at rest.
///     pub VolumeEncryption for "storage-volume";
///     id "volume-encryption";
///     describe "Checks that storage volumes are encrypted";
///     flag(cx) { !cx.props().get_bool("encrypted", false) }
///     message(cx) {
///         format!("Encryption is not enabled for the storage volume `{}`", cx.resource().name())
///     }
///     fn volume_encryption();
/// }
/// ```
///
/// **Explicit severity**, and `|`-separated alternatives in the type list:
/// ```rust,ignore
/// rule! {
///     pub NoOpenSsh for "security-group" | "security-group-rule";
///     id "no-open-ssh";
///     describe "Flags SSH open to the world";
///     severity Advisory;
///     flag(cx) { /* ... */ }
///     message(cx) { /* ... */ }
///     fn no_open_ssh();
/// }
/// ```
#[macro_export]
macro_rules! rule {
    // ── Variant 1a: explicit severity + factory fn ───────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $($rtype:literal)|+;
        id $id:literal;
        describe $describe:literal;
        severity $severity:ident;
        flag($fcx:ident) $flag:block
        message($mcx:ident) $message:block
        fn $factory:ident();
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name for $($rtype)|+;
            id $id;
            describe $describe;
            severity $severity;
            flag($fcx) $flag
            message($mcx) $message
        }

        #[must_use]
        $vis const fn $factory() -> $name { $name }
    };

    // ── Variant 1b: explicit severity, no factory ────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $($rtype:literal)|+;
        id $id:literal;
        describe $describe:literal;
        severity $severity:ident;
        flag($fcx:ident) $flag:block
        message($mcx:ident) $message:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::rule::Rule for $name {
            fn id(&self) -> &str { $id }

            fn description(&self) -> &str { $describe }

            fn severity(&self) -> $crate::violation::Severity {
                $crate::violation::Severity::$severity
            }

            fn applies_to(&self, resource_type: &str) -> bool {
                matches!(resource_type, $($rtype)|+)
            }

            #[allow(unused_variables)]
            fn check(
                &self,
                cx: &mut $crate::rule::CheckContext<'_>,
            ) -> ::std::result::Result<(), $crate::rule::RuleError> {
                let flagged: bool = {
                    let $fcx = &*cx;
                    $flag
                };
                if flagged {
                    let message = {
                        let $mcx = &*cx;
                        $message
                    };
                    cx.report(message);
                }
                Ok(())
            }
        }
    };

    // ── Variant 2a: default (mandatory) severity + factory fn ────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $($rtype:literal)|+;
        id $id:literal;
        describe $describe:literal;
        flag($fcx:ident) $flag:block
        message($mcx:ident) $message:block
        fn $factory:ident();
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name for $($rtype)|+;
            id $id;
            describe $describe;
            severity Mandatory;
            flag($fcx) $flag
            message($mcx) $message
            fn $factory();
        }
    };

    // ── Variant 2b: default (mandatory) severity, no factory ─────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident for $($rtype:literal)|+;
        id $id:literal;
        describe $describe:literal;
        flag($fcx:ident) $flag:block
        message($mcx:ident) $message:block
    ) => {
        $crate::rule! {
            $(#[$meta])*
            $vis $name for $($rtype)|+;
            id $id;
            describe $describe;
            severity Mandatory;
            flag($fcx) $flag
            message($mcx) $message
        }
    };
}
