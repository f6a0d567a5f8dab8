/*!
Command layer: one module per resource group plus shared helpers.

  src/cmd/
    mod.rs                      (this file)
    shared.rs                   Session, common flags, run / confirm / emit
    select.rs                   --select parsing and projection
    format.rs                   human table rendering
    definition.rs               template definition flags
    connector.rs                pcaad connector ...
    directory_registration.rs   pcaad directory-registration ...
    service_principal_name.rs   pcaad service-principal-name ...
    template.rs                 pcaad template ...
    access_control_entry.rs     pcaad access-control-entry ...
    tag.rs                      pcaad tag ...

Every command builds one typed operation from its flags and hands it to
`shared::run`; nothing here talks HTTP directly.
*/

pub mod access_control_entry;
pub mod connector;
pub mod definition;
pub mod directory_registration;
pub mod format;
pub mod select;
pub mod service_principal_name;
pub mod shared;
pub mod tag;
pub mod template;

pub use access_control_entry::{AccessControlEntryCommand, execute_access_control_entry};
pub use connector::{ConnectorCommand, execute_connector};
pub use directory_registration::{DirectoryRegistrationCommand, execute_directory_registration};
pub use service_principal_name::{ServicePrincipalNameCommand, execute_service_principal_name};
pub use shared::Session;
pub use tag::{TagCommand, execute_tag};
pub use template::{TemplateCommand, execute_template};
