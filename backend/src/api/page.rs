//! Single-page upload form served at `/`.

/// Upload page. Posts the chosen workbook to `/api/upload`, then offers the
/// result as a download or shows the error with its trace.
pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>TTD Excel Processor</title>
<style>
  body { font-family: sans-serif; max-width: 42rem; margin: 3rem auto; }
  #error { color: #b00020; }
  pre { background: #f4f4f4; padding: 1rem; overflow-x: auto; }
</style>
</head>
<body>
<h1>TTD Excel Processor</h1>
<form id="upload">
  <label>Choose an Excel file
    <input type="file" name="file" accept=".xlsx,.xls" required>
  </label>
  <button type="submit">Process</button>
</form>
<p id="status"></p>
<a id="download" hidden>Download Processed Excel</a>
<p id="error" hidden></p>
<pre id="trace" hidden></pre>
<script>
const form = document.getElementById('upload');
const status = document.getElementById('status');
const download = document.getElementById('download');
const error = document.getElementById('error');
const trace = document.getElementById('trace');

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  download.hidden = true; error.hidden = true; trace.hidden = true;
  status.textContent = 'Processing...';

  const response = await fetch('/api/upload', { method: 'POST', body: new FormData(form) });
  status.textContent = '';
  if (response.ok) {
    const blob = await response.blob();
    const name = (response.headers.get('content-disposition') || '').match(/filename="([^"]+)"/);
    download.href = URL.createObjectURL(blob);
    download.download = name ? name[1] : 'ttd_output.xlsx';
    download.hidden = false;
    status.textContent = 'File processed!';
  } else {
    const body = await response.json();
    error.textContent = 'Error: ' + body.error;
    trace.textContent = body.trace.join('\n  caused by: ');
    error.hidden = false; trace.hidden = false;
  }
});
</script>
</body>
</html>
"#;
