pub(crate) const RECONF_ASSERT_LEVEL_DEFINITION: u8 =
    if cfg!(any(test, feature = "debug-checks")) {
        RECONF_ASSERT_EXTREME
    } else {
        RECONF_ASSERT_SIMPLE
    };

pub(crate) const RECONF_ASSERT_SIMPLE: u8 = 1;
pub(crate) const RECONF_ASSERT_MODERATE: u8 = 2;
pub(crate) const RECONF_ASSERT_ADVANCED: u8 = 3;
pub(crate) const RECONF_ASSERT_EXTREME: u8 = 4;

macro_rules! reconf_assert_simple {
    ($($arg:tt)*) => {
        if $crate::reconf_asserts::RECONF_ASSERT_LEVEL_DEFINITION >= $crate::reconf_asserts::RECONF_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! reconf_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::reconf_asserts::RECONF_ASSERT_LEVEL_DEFINITION >= $crate::reconf_asserts::RECONF_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! reconf_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::reconf_asserts::RECONF_ASSERT_LEVEL_DEFINITION >= $crate::reconf_asserts::RECONF_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! reconf_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::reconf_asserts::RECONF_ASSERT_LEVEL_DEFINITION >= $crate::reconf_asserts::RECONF_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

pub(crate) use reconf_assert_advanced;
pub(crate) use reconf_assert_eq_simple;
pub(crate) use reconf_assert_moderate;
pub(crate) use reconf_assert_simple;
