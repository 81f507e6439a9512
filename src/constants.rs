/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Accepted values for the `emuso` flag
pub const EMUSO_VALUES: [&str; 2] = ["S", "N"];

// Response messages, kept verbatim for existing API clients.
pub const MSG_REQUIRED_FIELDS: &str = "Todos os campos são obrigatórios";
pub const MSG_INVALID_EMAIL: &str = "Email inválido";
pub const MSG_INVALID_EMUSO: &str = "'emuso' deve ser 'S' ou 'N'";
pub const MSG_CODE_EXISTS: &str = "Código já existe";
pub const MSG_NOT_FOUND: &str = "Registro não encontrado";
pub const MSG_DELETED: &str = "Registro removido com sucesso";
pub const MSG_INTERNAL_ERROR: &str = "Erro interno do servidor";
