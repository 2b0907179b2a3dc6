use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let value = value.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|item| item.as_str().eq_ignore_ascii_case(value))
                    .ok_or_else(|| ParseStatusError {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseStatusError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

coded_enum! {
    pub enum SampleStatus as "sample status" {
        NotStarted => ("belum", "Belum dicacah"),
        InProgress => ("proses", "Sedang dicacah"),
        Completed => ("selesai", "Selesai"),
        Verified => ("terverifikasi", "Terverifikasi"),
    }
}

coded_enum! {
    pub enum Commodity as "commodity" {
        Padi => ("padi", "Padi"),
        Jagung => ("jagung", "Jagung"),
        Kedelai => ("kedelai", "Kedelai"),
        KacangTanah => ("kacang_tanah", "Kacang Tanah"),
        UbiKayu => ("ubi_kayu", "Ubi Kayu"),
    }
}

coded_enum! {
    #[derive(serde::Deserialize)]
    #[serde(try_from = "String")]
    pub enum UserRole as "user role" {
        Admin => ("admin", "Administrator"),
        Supervisor => ("pengawas", "Pengawas"),
        Enumerator => ("pencacah", "Pencacah"),
    }
}

impl UserRole {
    pub fn can_manage_users(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}
