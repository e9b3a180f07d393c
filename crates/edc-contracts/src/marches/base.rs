//! Base contract for marchés

use edc_core::error::ValidationErrors;
use edc_models::{Marche, ReferenceRegistry, RegistryKind};
use regex::Regex;
use std::sync::LazyLock;

use crate::base::{validate_amount, validate_present, Contract, ValidationResult};

/// Dossier numbers: letters, digits and the usual separators
static DOSSIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}0-9][\p{L}0-9 /._°-]*$").expect("static pattern")
});

pub const MAX_DOSSIER_LENGTH: usize = 100;
pub const MAX_OBJET_LENGTH: usize = 2000;

/// Field rules shared by create and update
///
/// When registries are supplied, categorical fields must hold one of their
/// values (blank is always accepted).
#[derive(Default)]
pub struct MarcheBaseContract<'a> {
    registries: Option<&'a [ReferenceRegistry]>,
}

impl<'a> MarcheBaseContract<'a> {
    pub fn new(registries: Option<&'a [ReferenceRegistry]>) -> Self {
        Self { registries }
    }

    pub fn validate_numero(&self, numero: &str, errors: &mut ValidationErrors) {
        validate_present("numero_dossier", numero, MAX_DOSSIER_LENGTH, errors);
        let numero = numero.trim();
        if !numero.is_empty() && !DOSSIER_PATTERN.is_match(numero) {
            errors.add(
                "numero_dossier",
                "is invalid. Only letters, digits, spaces and / . _ - are allowed",
            );
        }
    }

    fn validate_registry_value(
        &self,
        field: &str,
        kind: RegistryKind,
        value: &str,
        errors: &mut ValidationErrors,
    ) {
        let Some(registries) = self.registries else {
            return;
        };
        if value.trim().is_empty() {
            return;
        }
        if let Some(registry) = registries.iter().find(|r| r.kind == kind) {
            if !registry.contains(value) {
                errors.add(field, format!("'{}' is not a known {} value", value, kind.as_str()));
            }
        }
    }

    pub fn validate_execution(&self, marche: &Marche, errors: &mut ValidationErrors) {
        let execution = &marche.execution;
        if let Some(contract) = &execution.contract {
            validate_amount("execution.contract.montant", contract.montant, errors);
        }
        for decompte in &execution.decomptes {
            validate_amount("execution.decomptes", decompte.montant, errors);
        }
    }
}

impl<'a> Contract<Marche> for MarcheBaseContract<'a> {
    fn validate(&self, marche: &Marche) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_numero(&marche.numero_dossier, &mut errors);
        validate_present("objet", &marche.objet, MAX_OBJET_LENGTH, &mut errors);
        validate_amount("montant_prevu", marche.montant_prevu, &mut errors);

        self.validate_registry_value("fonction", RegistryKind::Functions, &marche.fonction, &mut errors);
        self.validate_registry_value("type_ao", RegistryKind::AoTypes, &marche.type_ao, &mut errors);
        self.validate_registry_value(
            "type_prestation",
            RegistryKind::PrestationTypes,
            &marche.type_prestation,
            &mut errors,
        );
        self.validate_execution(marche, &mut errors);

        errors.into_result()
    }
}
