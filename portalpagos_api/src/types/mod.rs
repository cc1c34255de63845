mod historial;
pub use self::historial::{HistorialFields, HistorialRecord};

mod preference;
pub use self::preference::{PaymentPayload, PreferenceRequest, PreferenceResponse};

mod record;
pub use self::record::RegistroDeuda;

mod sistema;
pub use self::sistema::SistemaPago;
