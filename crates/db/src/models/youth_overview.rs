//! Youth-overview roster rows.
//!
//! The table has one text column per roster field. The row struct, the
//! select list and the field list are generated from a single column list
//! so they cannot drift apart.

use opvang_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

macro_rules! define_roster_row {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $field:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, FromRow)]
        pub struct $name {
            pub badge: String,
            $( pub $field: Option<String>, )+
            pub tab_location: String,
            pub created_at: Timestamp,
            pub updated_at: Timestamp,
        }

        /// Column list for `youth_overview` queries.
        pub const COLUMNS: &str = concat!(
            "badge, ",
            $( stringify!($field), ", ", )+
            "tab_location, created_at, updated_at"
        );

        /// Writable columns, in table order.
        pub const FIELD_NAMES: &[&str] = &[ $( stringify!($field), )+ "tab_location" ];
    };
}

define_roster_row! {
    /// A row from the `youth_overview` table.
    YouthOverview {
        naam,
        voornaam,
        geboortedatum,
        leeftijd,
        todos,
        aandachtspunten,
        datum_in,
        intake,
        referent,
        gb,
        nb,
        back_up,
        hr,
        procedure,
        voogd,
        advocaat,
        twijfel,
        uitnodiging,
        test,
        resultaat,
        opvolging_door,
        betekening,
        wijziging_match_it,
        scan_dv,
        versie,
        voorlopige_versie_klaar,
        voorlopige_versie_verzonden,
        definitieve_versie,
        procedureles,
        og,
        mdo,
        mdo2,
        bxl_uitstap,
        context,
        opbouw_context,
        specificaties,
        stavaza,
        autonomie,
        context2,
        medisch,
        pleegzorg,
        aanmelding_nodig,
        vist_adoc,
        datum_transfer,
        transferdossier_verzonden,
        out_status,
    }
}

/// Result row of the age-verification view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AgeVerification {
    pub badge: String,
    pub resultaat: String,
}
