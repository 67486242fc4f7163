//! Textual contract router.
//!
//! The ledger boundary is purely textual: a function name plus positional
//! string arguments in, JSON bytes out. Lists, maps and filters travel as
//! JSON strings, amounts as decimal strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::domain::{
    ContractError, DocumentData, LinkFields, NewDocument, NewDocumentType, QueryFilter,
    TransactionContext,
};
use crate::ports::SpendingContractApi;

/// Functions exported by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    /// `(id, name, description, requiredFieldsJSON, optionalFieldsJSON)`
    RegisterDocumentType,
    /// `(id)`
    GetDocumentType,
    /// `(orgId)`, empty for all.
    ListDocumentTypes,
    /// `(id)`
    DeactivateDocumentType,
    /// `(id, typeId, title, description, amount, currency, dataJSON,
    /// linkedDocId, linkedChannel, linkedDocHash, linkedDirection)`
    CreateDocument,
    /// `(id, typeId, title, description, amount, currency, dataJSON)`
    CreateSimpleDocument,
    /// `(id)`
    GetDocument,
    /// `(filterJSON)`
    QueryDocuments,
    /// `(id, reason, correctionDocId)`
    InvalidateDocument,
    /// `(id, linkedDocId, linkedChannel, linkedDocHash)`
    UpdateDocumentLink,
    /// `(id)`
    GetDocumentHistory,
}

impl ContractFunction {
    /// Every exported function.
    pub const ALL: [ContractFunction; 11] = [
        ContractFunction::RegisterDocumentType,
        ContractFunction::GetDocumentType,
        ContractFunction::ListDocumentTypes,
        ContractFunction::DeactivateDocumentType,
        ContractFunction::CreateDocument,
        ContractFunction::CreateSimpleDocument,
        ContractFunction::GetDocument,
        ContractFunction::QueryDocuments,
        ContractFunction::InvalidateDocument,
        ContractFunction::UpdateDocumentLink,
        ContractFunction::GetDocumentHistory,
    ];

    /// Exported name.
    pub fn name(&self) -> &'static str {
        match self {
            ContractFunction::RegisterDocumentType => "RegisterDocumentType",
            ContractFunction::GetDocumentType => "GetDocumentType",
            ContractFunction::ListDocumentTypes => "ListDocumentTypes",
            ContractFunction::DeactivateDocumentType => "DeactivateDocumentType",
            ContractFunction::CreateDocument => "CreateDocument",
            ContractFunction::CreateSimpleDocument => "CreateSimpleDocument",
            ContractFunction::GetDocument => "GetDocument",
            ContractFunction::QueryDocuments => "QueryDocuments",
            ContractFunction::InvalidateDocument => "InvalidateDocument",
            ContractFunction::UpdateDocumentLink => "UpdateDocumentLink",
            ContractFunction::GetDocumentHistory => "GetDocumentHistory",
        }
    }

    /// Look a function up by exported name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        match self {
            ContractFunction::RegisterDocumentType => 5,
            ContractFunction::GetDocumentType
            | ContractFunction::ListDocumentTypes
            | ContractFunction::DeactivateDocumentType
            | ContractFunction::GetDocument
            | ContractFunction::QueryDocuments
            | ContractFunction::GetDocumentHistory => 1,
            ContractFunction::CreateDocument => 11,
            ContractFunction::CreateSimpleDocument => 7,
            ContractFunction::InvalidateDocument => 3,
            ContractFunction::UpdateDocumentLink => 4,
        }
    }

    /// Whether the function leaves the world state untouched.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            ContractFunction::GetDocumentType
                | ContractFunction::ListDocumentTypes
                | ContractFunction::GetDocument
                | ContractFunction::QueryDocuments
                | ContractFunction::GetDocumentHistory
        )
    }
}

impl fmt::Display for ContractFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dispatches textual invocations onto a [`SpendingContractApi`].
pub struct ContractRouter<C: SpendingContractApi> {
    contract: C,
}

impl<C: SpendingContractApi> ContractRouter<C> {
    /// Route onto `contract`.
    pub fn new(contract: C) -> Self {
        Self { contract }
    }

    /// The routed contract.
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Run a read-only function. Mutating functions are refused.
    pub fn evaluate(
        &self,
        ctx: &TransactionContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let resolved = resolve(function, args)?;
        if !resolved.is_read_only() {
            return Err(ContractError::NotReadOnly(function.to_string()));
        }
        self.dispatch(ctx, resolved, args)
    }

    /// Run any function. Writes commit before this returns.
    pub fn submit(
        &self,
        ctx: &TransactionContext,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let resolved = resolve(function, args)?;
        self.dispatch(ctx, resolved, args)
    }

    fn dispatch(
        &self,
        ctx: &TransactionContext,
        function: ContractFunction,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        debug!(
            channel = %ctx.channel_id,
            tx_id = %ctx.tx_id,
            function = %function,
            "[gl-01] Invoking contract function"
        );
        let c = &self.contract;
        match function {
            ContractFunction::RegisterDocumentType => {
                let request = NewDocumentType {
                    id: args[0].clone(),
                    name: args[1].clone(),
                    description: args[2].clone(),
                    required_fields: parse_json_or_default(&args[3], "requiredFields")?,
                    optional_fields: parse_json_or_default(&args[4], "optionalFields")?,
                };
                encode(&c.register_document_type(ctx, request)?)
            }
            ContractFunction::GetDocumentType => encode(&c.get_document_type(ctx, &args[0])?),
            ContractFunction::ListDocumentTypes => {
                encode(&c.list_document_types(ctx, non_empty(&args[0]))?)
            }
            ContractFunction::DeactivateDocumentType => {
                c.deactivate_document_type(ctx, &args[0])?;
                Ok(Vec::new())
            }
            ContractFunction::CreateDocument | ContractFunction::CreateSimpleDocument => {
                let link = if function == ContractFunction::CreateDocument {
                    LinkFields {
                        linked_doc_id: args[7].clone(),
                        linked_channel: args[8].clone(),
                        linked_doc_hash: args[9].clone(),
                        linked_direction: args[10].parse()?,
                    }
                } else {
                    LinkFields::default()
                };
                let request = NewDocument {
                    id: args[0].clone(),
                    document_type_id: args[1].clone(),
                    title: args[2].clone(),
                    description: args[3].clone(),
                    amount: parse_amount(&args[4])?,
                    currency: args[5].clone(),
                    data: parse_json_or_default::<DocumentData>(&args[6], "data")?,
                    link,
                };
                encode(&c.create_document(ctx, request)?)
            }
            ContractFunction::GetDocument => encode(&c.get_document(ctx, &args[0])?),
            ContractFunction::QueryDocuments => {
                let filter: QueryFilter = parse_json_or_default(&args[0], "filter")?;
                encode(&c.query_documents(ctx, &filter)?)
            }
            ContractFunction::InvalidateDocument => {
                c.invalidate_document(ctx, &args[0], &args[1], non_empty(&args[2]))?;
                Ok(Vec::new())
            }
            ContractFunction::UpdateDocumentLink => {
                c.update_document_link(ctx, &args[0], &args[1], &args[2], &args[3])?;
                Ok(Vec::new())
            }
            ContractFunction::GetDocumentHistory => encode(&c.get_document_history(ctx, &args[0])?),
        }
    }
}

fn resolve(function: &str, args: &[String]) -> Result<ContractFunction, ContractError> {
    let resolved = ContractFunction::from_name(function)
        .ok_or_else(|| ContractError::UnknownFunction(function.to_string()))?;
    if args.len() != resolved.arity() {
        return Err(ContractError::WrongArity {
            function: function.to_string(),
            expected: resolved.arity(),
            got: args.len(),
        });
    }
    Ok(resolved)
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn parse_amount(raw: &str) -> Result<f64, ContractError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ContractError::invalid_argument("amount", e.to_string()))
}

/// Empty text decodes as the type's default.
fn parse_json_or_default<T: DeserializeOwned + Default>(
    raw: &str,
    name: &str,
) -> Result<T, ContractError> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| ContractError::invalid_argument(name, format!("invalid JSON: {e}")))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::Marshal {
        what: "result",
        reason: e.to_string(),
    })
}
